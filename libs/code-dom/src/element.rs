//! Elements of the code tree
//!
//! An [`Element`] is a named declaration owned by exactly one parent. The
//! declaration-specific payload lives in [`ElementData`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::class::{ClassData, InterfaceData};
use crate::members::{EnumData, IndexerData, MethodData, ParameterData, PropertyData};

/// Arena index of an element inside its [`crate::CodeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub description: Option<String>,
    pub external_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub message: Option<String>,
    pub since: Option<String>,
    pub removal_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementData {
    Namespace,
    Class(ClassData),
    Interface(InterfaceData),
    Enum(EnumData),
    Property(PropertyData),
    Method(MethodData),
    Parameter(ParameterData),
    Indexer(IndexerData),
}

impl ElementData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementData::Namespace => "namespace",
            ElementData::Class(_) => "class",
            ElementData::Interface(_) => "interface",
            ElementData::Enum(_) => "enum",
            ElementData::Property(_) => "property",
            ElementData::Method(_) => "method",
            ElementData::Parameter(_) => "parameter",
            ElementData::Indexer(_) => "indexer",
        }
    }

    /// Whether an element of this kind may own `child`
    pub(crate) fn accepts(&self, child: &ElementData) -> bool {
        match self {
            ElementData::Namespace => matches!(
                child,
                ElementData::Namespace
                    | ElementData::Class(_)
                    | ElementData::Interface(_)
                    | ElementData::Enum(_)
            ),
            ElementData::Class(_) | ElementData::Interface(_) => matches!(
                child,
                ElementData::Class(_)
                    | ElementData::Interface(_)
                    | ElementData::Enum(_)
                    | ElementData::Property(_)
                    | ElementData::Method(_)
                    | ElementData::Indexer(_)
            ),
            ElementData::Method(_) => matches!(child, ElementData::Parameter(_)),
            ElementData::Enum(_)
            | ElementData::Property(_)
            | ElementData::Parameter(_)
            | ElementData::Indexer(_) => false,
        }
    }

    /// Can be the target of a declared type reference
    pub fn is_type_definition(&self) -> bool {
        matches!(
            self,
            ElementData::Class(_) | ElementData::Interface(_) | ElementData::Enum(_)
        )
    }
}

/// An element not yet placed in a tree
#[derive(Debug, Clone)]
pub struct NewElement {
    pub name: String,
    pub documentation: Documentation,
    pub deprecation: Option<Deprecation>,
    pub data: ElementData,
}

impl NewElement {
    pub fn new(name: impl Into<String>, data: ElementData) -> Self {
        Self {
            name: name.into(),
            documentation: Documentation::default(),
            deprecation: None,
            data,
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, ElementData::Namespace)
    }

    pub fn class(name: impl Into<String>, data: ClassData) -> Self {
        Self::new(name, ElementData::Class(data))
    }

    pub fn interface(name: impl Into<String>, data: InterfaceData) -> Self {
        Self::new(name, ElementData::Interface(data))
    }

    pub fn enumeration(name: impl Into<String>, data: EnumData) -> Self {
        Self::new(name, ElementData::Enum(data))
    }

    pub fn property(name: impl Into<String>, data: PropertyData) -> Self {
        Self::new(name, ElementData::Property(data))
    }

    pub fn method(name: impl Into<String>, data: MethodData) -> Self {
        Self::new(name, ElementData::Method(data))
    }

    pub fn parameter(name: impl Into<String>, data: ParameterData) -> Self {
        Self::new(name, ElementData::Parameter(data))
    }

    pub fn indexer(name: impl Into<String>, data: IndexerData) -> Self {
        Self::new(name, ElementData::Indexer(data))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.documentation.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    /// Folded child name to child id
    pub(crate) child_index: HashMap<String, ElementId>,
    pub documentation: Documentation,
    pub deprecation: Option<Deprecation>,
    pub(crate) data: ElementData,
}

impl Element {
    pub(crate) fn from_new(id: ElementId, parent: Option<ElementId>, new: NewElement) -> Self {
        Self {
            id,
            name: new.name,
            parent,
            children: Vec::new(),
            child_index: HashMap::new(),
            documentation: new.documentation,
            deprecation: new.deprecation,
            data: new.data,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.data, ElementData::Namespace)
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            ElementData::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceData> {
        match &self.data {
            ElementData::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumData> {
        match &self.data {
            ElementData::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyData> {
        match &self.data {
            ElementData::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodData> {
        match &self.data {
            ElementData::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterData> {
        match &self.data {
            ElementData::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn as_indexer(&self) -> Option<&IndexerData> {
        match &self.data {
            ElementData::Indexer(indexer) => Some(indexer),
            _ => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut ElementData {
        &mut self.data
    }
}
