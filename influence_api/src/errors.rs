//! Error types for the API client.

/// Errors that can occur when fetching from the upstream services.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read
    /// (connection refused, timeout, TLS failure).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The upstream service returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// A URL could not be assembled from the base and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A URI template and the values supplied to it disagree.
///
/// This is a configuration defect in an endpoint declaration, never a
/// user-facing validation failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder was left without a value after substitution.
    #[error("placeholder ':{placeholder}' in '{template}' was not resolved")]
    Unresolved {
        template: String,
        placeholder: String,
    },
    /// A value of `.` or `..` would be collapsed into a relative path step.
    #[error("placeholder ':{placeholder}' in '{template}' cannot be a dot segment")]
    DotSegment {
        template: String,
        placeholder: String,
    },
    /// A placeholder names a parameter the endpoint does not declare.
    #[error("placeholder ':{placeholder}' in '{template}' has no matching parameter")]
    UndeclaredPlaceholder {
        template: String,
        placeholder: String,
    },
    /// A placeholder appears more than once in a single template.
    #[error("placeholder ':{placeholder}' appears more than once in '{template}'")]
    DuplicatePlaceholder {
        template: String,
        placeholder: String,
    },
}
