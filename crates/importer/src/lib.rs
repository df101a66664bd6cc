pub mod canonical;
pub mod error;

pub use error::{ImporterError, Result};
