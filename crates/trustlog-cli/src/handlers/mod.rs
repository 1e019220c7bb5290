pub mod analyze;
pub mod inspect;
