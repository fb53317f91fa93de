//! Input pipeline errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the device collaborator.
///
/// None of these abort the pipeline: enumeration and open failures shrink
/// the device set, a read failure ends only the reader that hit it.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot enumerate input devices in {}: {source}", dir.display())]
    Enumeration { dir: PathBuf, source: io::Error },

    #[error("cannot open input device {}: {source}", path.display())]
    DeviceUnavailable { path: PathBuf, source: io::Error },

    #[error("read failed on {}: {source}", path.display())]
    DeviceRead { path: PathBuf, source: io::Error },

    #[error("failed to start reader thread for {}: {source}", path.display())]
    Spawn { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, InputError>;
