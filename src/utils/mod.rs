pub mod error;

pub use error::{FleetcheckError, Result};
