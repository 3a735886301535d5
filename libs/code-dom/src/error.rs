//! Error types for the code object model
//!
//! Every variant here is a structural violation: the tree was built
//! inconsistently by the front end and the current pass cannot continue.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Duplicate name: `{name}` already exists under `{parent}`")]
    DuplicateName { parent: String, name: String },

    #[error("Dangling type reference from `{from}` to `{target}`")]
    DanglingReference { from: String, target: String },

    #[error("Cyclic base chain through `{class}`")]
    CyclicBaseChain { class: String },

    #[error("Invalid composed type: {0}")]
    InvalidComposedType(String),

    #[error("Element `{child}` is not a child of `{parent}`")]
    NotAttached { parent: String, child: String },

    #[error("Element `{name}` is not a {expected}")]
    ElementKindMismatch {
        name: String,
        expected: &'static str,
    },
}
