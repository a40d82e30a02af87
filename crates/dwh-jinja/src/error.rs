//! Error types for dwh-jinja

use thiserror::Error;

/// Templating errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Template render error (J001)
    #[error("[J001] Jinja render error: {0}")]
    RenderError(String),

    /// Template references a parameter that was not supplied (J002)
    #[error("[J002] Undefined template parameter in '{template}': {detail}")]
    UndefinedParameter { template: String, detail: String },

    /// Template name was never registered (J003)
    #[error("[J003] Unknown template '{name}'")]
    UnknownTemplate { name: String },
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        JinjaError::RenderError(err.to_string())
    }
}
