//! Code object model for SDK generation
//!
//! A language-agnostic tree of the declarations making up a client library:
//! namespaces, classes, interfaces, enums and their members. Backends read it
//! to decide what to emit; they never own it.
//!
//! ## Layout
//!
//! - [`CodeTree`] owns every [`Element`] in an arena. Children are owned by
//!   exactly one parent; parent links and type references are [`ElementId`]s.
//! - [`TypeReference`] describes a value's type: primitive, declared (possibly
//!   external to the tree) or composed (union/intersection).
//! - [`kinds`] holds the closed taxonomies (class, property, method and
//!   parameter kinds) that synthesis matches on.
//! - Base-chain queries, indexer lowering and structural validation are
//!   inherent methods of [`CodeTree`].

pub mod class;
pub mod element;
pub mod error;
pub mod indexer;
mod inheritance;
pub mod kinds;
pub mod members;
pub mod names;
pub mod tree;
pub mod types;
mod validate;

pub use class::{ClassData, DiscriminatorInfo, DiscriminatorMapping, ImplementsSet, InterfaceData};
pub use element::{Deprecation, Documentation, Element, ElementData, ElementId, NewElement};
pub use error::{Error, Result};
pub use kinds::{
    Access, ClassKind, HttpMethod, InterfaceKind, MethodKind, ParameterKind, PropertyKind,
};
pub use members::{
    EnumData, EnumOption, IndexerData, IndexerOrigin, IndexerRole, MethodData, ParameterData,
    PropertyData,
};
pub use tree::CodeTree;
pub use types::{CollectionKind, ComposedType, CompositionMode, DeclaredType, TypeReference, TypeTarget};
