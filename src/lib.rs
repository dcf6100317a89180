// src/lib.rs
pub mod data;
pub mod error;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use error::LinkageError;
