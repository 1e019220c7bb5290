pub mod error;
pub mod outcome;
pub mod record;
pub mod task;
pub mod trust;

pub use error::{Error, Result};
pub use outcome::*;
pub use record::*;
pub use task::*;
pub use trust::*;
