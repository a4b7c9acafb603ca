pub mod consts;
pub mod disparity;
pub mod error;
pub mod fraction;
pub mod io;
pub mod normalize;
pub mod params;
pub mod pipeline;
pub mod solver;
