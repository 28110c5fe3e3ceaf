//! Error types shared by the event intake, both API gateways, and the
//! reconciler.

use thiserror::Error;

/// Errors surfaced while loading configuration, parsing the event payload, or
/// talking to GitHub and Heroku.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewAppError {
    /// A required setting or credential was not provided by any source.
    #[error("{name} is required")]
    MissingSetting {
        /// Name of the setting, including its legacy environment variable.
        name: &'static str,
    },

    /// Configuration could not be loaded or contained an invalid value.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A URL could not be parsed or rewritten.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The workflow was triggered by an event this step does not handle.
    #[error("unsupported event `{event}`: expected pull_request or pull_request_target")]
    UnsupportedEvent {
        /// Event name reported by the runner.
        event: String,
    },

    /// The webhook payload is missing fields or has an unexpected shape.
    #[error("event payload is invalid: {message}")]
    InvalidEvent {
        /// Description of the payload violation.
        message: String,
    },

    /// An API rejected the supplied token.
    #[error("{service} rejected the token: {message}")]
    Authentication {
        /// Service that rejected the credentials.
        service: &'static str,
        /// Error detail returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    GitHub {
        /// Response detail describing the failure.
        message: String,
    },

    /// Heroku returned a failing status, or a body that could not be decoded.
    #[error("Heroku API error ({status}): {message}")]
    Platform {
        /// HTTP status code returned by Heroku.
        status: u16,
        /// Error message from the Heroku error body.
        message: String,
    },

    /// Networking failed while calling an API.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
