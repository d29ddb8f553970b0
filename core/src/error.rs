//! Error types and handling for convpage core

use std::fmt;
use thiserror::Error;

/// Result type alias for convpage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for convpage core
#[derive(Error, Debug)]
pub enum Error {
    /// Retrieving or decoding the preview resource failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The decoded payload does not match the preview schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Building nodes on the surface failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Page shell template errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Page shell template syntax errors
    #[error("Template syntax error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Coarse failure cause, used as a structured logging field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Transport or decode failure
    Network,
    /// Empty or malformed payload
    Schema,
    /// Surface lookup or construction failure
    Render,
    /// Anything else
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Schema => "schema",
            FailureKind::Render => "render",
            FailureKind::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error for diagnostics
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::Fetch(_) | Error::Http(_) => FailureKind::Network,
            Error::Schema(_) => FailureKind::Schema,
            Error::Render(_) | Error::Template(_) | Error::TemplateSyntax(_) => {
                FailureKind::Render
            }
            Error::Config(_) | Error::Io(_) | Error::Generic(_) => FailureKind::Internal,
        }
    }
}

/// Preview retrieval errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Preview file not found: {path}")]
    NotFound { path: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Preview body is not valid JSON: {message}")]
    Decode { message: String },
}

/// A single schema violation found while validating a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Location of the offending value, e.g. `[0].faq[1].answer`
    pub path: String,
    /// What is wrong with it
    pub problem: String,
}

impl SchemaIssue {
    pub fn new<P: Into<String>, M: Into<String>>(path: P, problem: M) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.path, self.problem)
        }
    }
}

/// Every schema violation found in one payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaError {
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }

    pub fn single<P: Into<String>, M: Into<String>>(path: P, problem: M) -> Self {
        Self::new(vec![SchemaIssue::new(path, problem)])
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => write!(f, "invalid preview payload"),
            [only] => write!(f, "{}", only),
            issues => {
                write!(f, "{} problems in preview payload", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "\n  {}. {}", i + 1, issue)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Surface construction errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Element not found: #{id}")]
    MissingElement { id: String },

    #[error("Unknown node: {node}")]
    UnknownNode { node: usize },

    #[error("Invalid append: {message}")]
    InvalidAppend { message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
