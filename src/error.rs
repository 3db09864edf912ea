//! Crate-level error types.

use std::fmt;

/// Errors produced by the morpho crate.
#[derive(Debug)]
pub enum MorphoError {
    /// Asset fetch or decode failure reported by the loader.
    Load(String),
    /// The rendering collaborator exposes no displacement extension slot.
    KernelPatch(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// The engine was used after [`dispose`](crate::engine::MorphEngine::dispose).
    Disposed,
}

impl fmt::Display for MorphoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(msg) => write!(f, "asset load error: {msg}"),
            Self::KernelPatch(msg) => {
                write!(f, "displacement kernel slot unavailable: {msg}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Disposed => write!(f, "engine has been disposed"),
        }
    }
}

impl std::error::Error for MorphoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MorphoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
