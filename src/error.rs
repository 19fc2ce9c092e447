//! Error types for marga-nav.
//!
//! Only the persistence and configuration layers surface these errors.
//! Grid and planner operations degrade instead of failing.

use thiserror::Error;

/// marga-nav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u8, found: u8 },

    #[error(
        "Dimension mismatch: expected {expected_x}x{expected_z} @ {expected_cell_size}, \
         found {found_x}x{found_z} @ {found_cell_size}"
    )]
    DimensionMismatch {
        expected_x: usize,
        expected_z: usize,
        expected_cell_size: f32,
        found_x: usize,
        found_z: usize,
        found_cell_size: f32,
    },

    #[error("Store locked after {attempts} attempts: {path}")]
    Locked { path: String, attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for NavError {
    fn from(e: serde_yaml::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
