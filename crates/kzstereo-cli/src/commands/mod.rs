pub mod config;
pub mod matching;
