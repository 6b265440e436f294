//! Error types for configuration, alignment, and tolerated failures.
//!
//! Construction and configuration problems surface eagerly as [`ConfigError`];
//! header resolution failures as [`AlignError`]. Both are ordinary error types
//! that flow through `anyhow::Result` like any other. [`Tolerance`] is the
//! read-session policy that downgrades matching failures to an empty sequence.

use std::fmt;
use std::sync::Arc;

/// An invalid configuration, reported when the offending call or `build()`
/// runs rather than when the data is first touched.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field the error concerns, when there is one.
    pub field: Option<String>,
    /// Human-readable error message.
    pub message: String,
}

impl ConfigError {
    /// Create a new configuration error with just a message.
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Create a configuration error about a specific field.
    pub fn field<S: Into<String>, M: Into<String>>(field: S, message: M) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "[{}] {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

/// A requested column name that the observed header row does not contain.
#[derive(Debug, Clone)]
pub struct AlignError {
    /// First requested name missing from the header.
    pub missing: String,
    /// The header row as observed, already split into cells.
    pub header: Vec<String>,
}

impl AlignError {
    pub fn new<S: Into<String>>(missing: S, header: Vec<String>) -> Self {
        Self {
            missing: missing.into(),
            header,
        }
    }
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column '{}' not found in header [{}]",
            self.missing,
            self.header.join(", ")
        )
    }
}

impl std::error::Error for AlignError {}

/// Policy deciding which open-phase failures a read session absorbs.
///
/// A tolerated failure turns the session into an empty sequence instead of
/// an error. Matching walks the whole cause chain, so a file-open failure
/// stays tolerable after context has been layered on top of it.
#[derive(Clone)]
pub struct Tolerance {
    predicate: Arc<dyn Fn(&anyhow::Error) -> bool + Send + Sync>,
}

impl Tolerance {
    /// Tolerate errors matching an arbitrary predicate.
    pub fn new(predicate: impl Fn(&anyhow::Error) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Tolerate errors whose cause chain contains an `E`.
    pub fn of<E: std::error::Error + 'static>() -> Self {
        Self::new(|err| err.chain().any(|cause| cause.is::<E>()))
    }

    /// Tolerate I/O errors, the common case for optional input files.
    pub fn io() -> Self {
        Self::of::<std::io::Error>()
    }

    /// Tolerate every failure.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Whether this policy absorbs `err`.
    pub fn matches(&self, err: &anyhow::Error) -> bool {
        (self.predicate)(err)
    }
}

impl fmt::Debug for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tolerance(..)")
    }
}
