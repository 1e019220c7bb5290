//! Event extractors: pure functions from a message to one typed value.
//!
//! Each extractor either matches its shape completely, with every numeric
//! field parsed, or fails with a [`ShapeError`]. Nothing is defaulted.

pub mod band;
pub mod keystore;
pub mod reputation;
pub mod task;
pub mod trust;

use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;

/// Why a message with a recognized prefix could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError(pub String);

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<trustlog_types::Error> for ShapeError {
    fn from(err: trustlog_types::Error) -> Self {
        ShapeError(err.to_string())
    }
}

pub type ExtractResult<T> = std::result::Result<T, ShapeError>;

/// Typed access to the capture groups of one matched shape
pub(crate) struct Fields<'t> {
    caps: Captures<'t>,
}

impl<'t> Fields<'t> {
    pub(crate) fn matched(regex: &Regex, text: &'t str, shape: &str) -> ExtractResult<Self> {
        regex
            .captures(text)
            .map(|caps| Fields { caps })
            .ok_or_else(|| ShapeError(format!("does not match {} shape", shape)))
    }

    pub(crate) fn text(&self, group: usize) -> &'t str {
        self.caps.get(group).map_or("", |m| m.as_str())
    }

    pub(crate) fn parse<T: FromStr>(&self, group: usize, field: &str) -> ExtractResult<T> {
        let raw = self.text(group);
        raw.parse()
            .map_err(|_| ShapeError(format!("invalid {}: '{}'", field, raw)))
    }

    /// A "0"/"1" flag
    pub(crate) fn flag(&self, group: usize, field: &str) -> ExtractResult<bool> {
        match self.text(group) {
            "0" => Ok(false),
            "1" => Ok(true),
            raw => Err(ShapeError(format!("invalid {}: '{}'", field, raw))),
        }
    }
}
