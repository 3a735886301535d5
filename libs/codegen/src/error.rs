//! Error types for resolution and synthesis

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Structural violation: {0}")]
    Structural(#[from] sdkgen_dom::Error),

    #[error("`{element}` is missing required argument: {argument}")]
    MissingRequiredArgument { element: String, argument: String },

    #[error("{construct} is not supported by the {backend} backend")]
    UnsupportedConstruct { construct: String, backend: String },

    #[error("Invalid description: {0}")]
    Description(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn missing(element: impl Into<String>, argument: impl Into<String>) -> Self {
        Error::MissingRequiredArgument {
            element: element.into(),
            argument: argument.into(),
        }
    }

    /// Structural problems abort the whole pass; everything else only fails
    /// the element being processed.
    pub fn is_fatal_for_pass(&self) -> bool {
        matches!(
            self,
            Error::Structural(_) | Error::Description(_) | Error::Json(_)
        )
    }
}
