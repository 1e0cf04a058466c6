pub mod config;
pub mod error;
pub mod llm;

pub use error::{Error, Result};
