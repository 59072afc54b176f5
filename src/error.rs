//! Error types for slide-rlnc.
//!
//! Only configuration can fail with a recoverable error: an unknown field id,
//! a symbol size the field cannot represent, or a factory asked to build an
//! instance for a field it was not configured with. Everything that happens
//! after a successful build is either a caller contract violation (window
//! outside the stream, wrong buffer length, pushing past capacity), which
//! panics, or an expected steady state (rank below the stream size), which is
//! reported through the decoder queries.
//!
//! # Error Categories
//!
//! - **Configuration**: invalid or inconsistent factory / codec settings
//! - **Input**: raw values from a host boundary that name nothing valid

use core::fmt;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // === Input ===
    /// Unrecognised finite field identifier.
    InvalidField,

    // === Configuration ===
    /// Symbol size is zero or not representable in the configured field.
    InvalidSymbolSize,
    /// Stream capacity is zero.
    InvalidStreamCapacity,
    /// A typed build was requested for a field other than the configured one.
    FieldMismatch,
    /// Configuration could not be loaded or parsed.
    InvalidConfig,
}

impl ErrorKind {
    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidField => ErrorCategory::Input,
            Self::InvalidSymbolSize
            | Self::InvalidStreamCapacity
            | Self::FieldMismatch
            | Self::InvalidConfig => ErrorCategory::Configuration,
        }
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid configuration supplied by the caller.
    Configuration,
    /// Raw values that do not name anything valid.
    Input,
}

/// The main error type for slide-rlnc operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if this error was caused by invalid configuration.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self.kind.category(), ErrorCategory::Configuration)
    }

    /// Creates an unknown-field error for a raw field id.
    #[must_use]
    pub fn invalid_field(id: i32) -> Self {
        Self::new(ErrorKind::InvalidField).with_message(format!("unknown finite field id {id}"))
    }

    /// Creates an invalid symbol size error.
    #[must_use]
    pub fn invalid_symbol_size(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSymbolSize).with_message(detail)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// A specialized Result type for slide-rlnc operations.
pub type Result<T> = core::result::Result<T, Error>;
