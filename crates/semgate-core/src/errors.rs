use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a check can hit maps to exactly one kind, and every kind
/// maps to a stable error code that tests and CI log scrapers can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidVersion,
    VersionNotIncreasing,
    UnsupportedScheme,
    InvalidPattern,

    // Resources
    NotFound,
    Fetch,
    MalformedArchive,
    ClassFormat,

    // Integration/IO
    Io,
    Serialization,
    Report,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            ExErrorKind::VersionNotIncreasing => "ERR_VERSION_NOT_INCREASING",
            ExErrorKind::UnsupportedScheme => "ERR_UNSUPPORTED_SCHEME",
            ExErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Fetch => "ERR_FETCH",
            ExErrorKind::MalformedArchive => "ERR_MALFORMED_ARCHIVE",
            ExErrorKind::ClassFormat => "ERR_CLASS_FORMAT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Report => "ERR_REPORT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds caused by bad user input rather than a failing resource
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::InvalidVersion
                | ExErrorKind::VersionNotIncreasing
                | ExErrorKind::UnsupportedScheme
                | ExErrorKind::InvalidPattern
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the operation and
/// artifact it happened in, for the one-line `ERROR:` diagnostic.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    artifact: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            artifact: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add artifact context (a path or URL)
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(artifact) = &self.artifact {
            write!(f, " (artifact: {})", artifact)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the decision core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemgateError {
    /// A declared version string is not `major.minor.patch`
    #[error("Version {version} cannot be parsed as a semantic version")]
    InvalidVersion { version: String },

    /// The new version is not strictly greater than the old one
    #[error("Version {new} does not strictly increase on version {old}")]
    VersionNotIncreasing { old: String, new: String },

    /// The new version does not increase, and the changes need more than a
    /// patch release
    #[error("The version change between {old} and {new} is {declared}, but the changes made to the code require a {required} version change (version {new} does not strictly increase on version {old})")]
    ChangesOnNonIncreasingVersion {
        old: String,
        new: String,
        declared: String,
        required: String,
    },

    /// An argument value is unusable
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An exclusion pattern is not a valid glob
    #[error("Invalid exclusion pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Report rendering or serialization failed
    #[error("Report failure: {reason}")]
    Report { reason: String },
}

impl From<SemgateError> for ExError {
    fn from(err: SemgateError) -> Self {
        let kind = match &err {
            SemgateError::InvalidVersion { .. } => ExErrorKind::InvalidVersion,
            SemgateError::VersionNotIncreasing { .. }
            | SemgateError::ChangesOnNonIncreasingVersion { .. } => {
                ExErrorKind::VersionNotIncreasing
            }
            SemgateError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            SemgateError::InvalidPattern { .. } => ExErrorKind::InvalidPattern,
            SemgateError::Report { .. } => ExErrorKind::Report,
        };
        ExError::new(kind).with_message(err.to_string())
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

/// Create an IO error tagged with the operation that failed
pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op.to_string())
        .with_message(err.to_string())
}
