use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KzError {
    #[error("Unable to decode {token} as fraction")]
    InvalidFraction { token: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unable to read image {}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Integer overflow while scaling cost parameters")]
    Overflow,

    #[error("Occlusion cost {0} is not positive, cannot derive lambda from it")]
    DegenerateOcclusionCost(f32),

    #[error("Invalid cost parameters: {0}")]
    InvalidParameters(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, KzError>;
