//! Type references
//!
//! A [`TypeReference`] describes the type of a value: a primitive, a link to a
//! type declared elsewhere in the tree, or a composition of several member
//! types. Links to declarations are arena ids, never owning pointers.

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::error::{Error, Result};

/// How a value is repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    None,
    Array,
    /// Keyed collection (map-like)
    Indexed,
}

/// Composition semantics of a [`ComposedType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionMode {
    /// Exactly one of the members is present
    Union,
    /// Every member facet may be present at once
    Intersection,
}

/// A link to a class, interface or enum declaration.
///
/// `target == None` marks a type declared outside this tree (for example a
/// base class shipped by a runtime library).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    pub target: Option<ElementId>,
}

/// Union or intersection of at least two member types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedType {
    name: String,
    mode: CompositionMode,
    members: Vec<TypeReference>,
}

impl ComposedType {
    pub fn new(
        name: impl Into<String>,
        mode: CompositionMode,
        members: Vec<TypeReference>,
    ) -> Result<Self> {
        let name = name.into();
        if members.len() < 2 {
            return Err(Error::InvalidComposedType(format!(
                "`{}` declares {} member(s), at least 2 are required",
                name,
                members.len()
            )));
        }
        Ok(Self {
            name,
            mode,
            members,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    pub fn members(&self) -> &[TypeReference] {
        &self.members
    }

    pub fn is_union(&self) -> bool {
        self.mode == CompositionMode::Union
    }

    pub fn is_intersection(&self) -> bool {
        self.mode == CompositionMode::Intersection
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTarget {
    Primitive(String),
    Declared(DeclaredType),
    Composed(ComposedType),
}

/// The type of a property, parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub target: TypeTarget,
    pub is_nullable: bool,
    pub collection: CollectionKind,
}

impl TypeReference {
    fn from_target(target: TypeTarget) -> Self {
        Self {
            target,
            is_nullable: true,
            collection: CollectionKind::None,
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::from_target(TypeTarget::Primitive(name.into()))
    }

    /// Reference to a declaration living in the same tree
    pub fn declared(name: impl Into<String>, target: ElementId) -> Self {
        Self::from_target(TypeTarget::Declared(DeclaredType {
            name: name.into(),
            target: Some(target),
        }))
    }

    /// Reference to a declaration outside the tree
    pub fn external(name: impl Into<String>) -> Self {
        Self::from_target(TypeTarget::Declared(DeclaredType {
            name: name.into(),
            target: None,
        }))
    }

    pub fn composed(composed: ComposedType) -> Self {
        Self::from_target(TypeTarget::Composed(composed))
    }

    pub fn with_collection(mut self, collection: CollectionKind) -> Self {
        self.collection = collection;
        self
    }

    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Display name of the referenced type
    pub fn name(&self) -> &str {
        match &self.target {
            TypeTarget::Primitive(name) => name,
            TypeTarget::Declared(declared) => &declared.name,
            TypeTarget::Composed(composed) => composed.name(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        match &mut self.target {
            TypeTarget::Primitive(current) => *current = name,
            TypeTarget::Declared(declared) => declared.name = name,
            TypeTarget::Composed(composed) => composed.name = name,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.collection != CollectionKind::None
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.target, TypeTarget::Primitive(_))
    }

    /// Arena id of the referenced declaration, if it lives in this tree
    pub fn declared_target(&self) -> Option<ElementId> {
        match &self.target {
            TypeTarget::Declared(declared) => declared.target,
            _ => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(&self.target, TypeTarget::Declared(declared) if declared.target.is_none())
    }

    pub fn as_composed(&self) -> Option<&ComposedType> {
        match &self.target {
            TypeTarget::Composed(composed) => Some(composed),
            _ => None,
        }
    }

    /// Same type with the collection wrapper stripped
    pub fn element_type(&self) -> TypeReference {
        self.clone().with_collection(CollectionKind::None)
    }

    /// Every leaf type: the members of a composed type, or the type itself
    pub fn all_types(&self) -> Vec<&TypeReference> {
        match &self.target {
            TypeTarget::Composed(composed) => composed
                .members()
                .iter()
                .flat_map(TypeReference::all_types)
                .collect(),
            _ => vec![self],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_type_requires_two_members() {
        let single = ComposedType::new(
            "pet",
            CompositionMode::Union,
            vec![TypeReference::primitive("string")],
        );
        assert!(matches!(single, Err(Error::InvalidComposedType(_))));

        let pair = ComposedType::new(
            "pet",
            CompositionMode::Union,
            vec![
                TypeReference::primitive("string"),
                TypeReference::primitive("integer"),
            ],
        )
        .unwrap();
        assert!(pair.is_union());
        assert_eq!(pair.members().len(), 2);
    }

    #[test]
    fn external_reference_has_no_target() {
        let external = TypeReference::external("Parsable");
        assert!(external.is_external());
        assert_eq!(external.declared_target(), None);
        assert_eq!(external.name(), "Parsable");
    }

    #[test]
    fn element_type_strips_collection() {
        let list = TypeReference::primitive("string").with_collection(CollectionKind::Array);
        assert!(list.is_collection());
        assert!(!list.element_type().is_collection());
    }
}
