//! Loader for JSON model descriptions
//!
//! Builds a [`CodeTree`] from a description document in two phases: every
//! namespace and type declaration is created first, then base types,
//! contracts, members and discriminator mappings are linked by name. The
//! finished tree is structurally validated before it is returned.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::debug;

use sdkgen_dom::names::fold;
use sdkgen_dom::{
    Access, ClassData, ClassKind, CodeTree, CollectionKind, ComposedType, CompositionMode,
    Deprecation, DiscriminatorInfo, ElementId, EnumData, EnumOption, HttpMethod, IndexerData,
    InterfaceData, InterfaceKind, MethodData, MethodKind, NewElement, ParameterData,
    ParameterKind, PropertyData, PropertyKind, TypeReference,
};

use crate::error::{Error, Result};

/// Type names read as primitives unless marked external
const PRIMITIVES: &[&str] = &[
    "string", "boolean", "bool", "integer", "int", "int16", "int32", "int64", "long", "sbyte",
    "byte", "float", "double", "decimal", "number", "guid", "uuid", "binary", "base64",
    "base64url", "datetimeoffset", "datetime", "date", "dateonly", "time", "timeonly",
    "duration", "timespan", "void", "object",
];

pub fn is_primitive_name(name: &str) -> bool {
    let folded = fold(name);
    PRIMITIVES.contains(&folded.as_str())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    /// Name of the root namespace; empty for an anonymous root
    #[serde(default)]
    pub root_namespace: String,
    #[serde(flatten)]
    pub contents: NamespaceContents,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceContents {
    #[serde(default)]
    pub namespaces: Vec<NamespaceDescription>,
    #[serde(default)]
    pub classes: Vec<ClassDescription>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescription>,
    #[serde(default)]
    pub enums: Vec<EnumDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDescription {
    pub name: String,
    #[serde(flatten)]
    pub contents: NamespaceContents,
}

/// A type given either as a bare name or in full
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Name(String),
    Full(TypeDescription),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collection: CollectionKind,
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Declared outside the described tree
    #[serde(default)]
    pub external: bool,
    #[serde(default)]
    pub composed: Option<ComposedDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedDescription {
    pub name: String,
    pub mode: CompositionMode,
    pub members: Vec<TypeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationDescription {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub removal_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorDescription {
    pub property_name: String,
    /// Discriminator value to target type
    #[serde(default)]
    pub mappings: BTreeMap<String, TypeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescription {
    pub name: String,
    #[serde(default = "default_class_kind")]
    pub kind: ClassKind,
    #[serde(default)]
    pub base: Option<TypeSpec>,
    #[serde(default)]
    pub implements: Vec<TypeSpec>,
    #[serde(default)]
    pub is_error_type: bool,
    /// Union/intersection this class materializes
    #[serde(default)]
    pub composed: Option<ComposedDescription>,
    #[serde(default)]
    pub discriminator: Option<DiscriminatorDescription>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
    #[serde(default)]
    pub indexer: Option<IndexerDescription>,
    #[serde(default)]
    pub inner_classes: Vec<ClassDescription>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: Option<DeprecationDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescription {
    pub name: String,
    #[serde(default = "default_interface_kind")]
    pub kind: InterfaceKind,
    #[serde(default)]
    pub implements: Vec<TypeSpec>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    pub name: String,
    #[serde(default = "default_property_kind")]
    pub kind: PropertyKind,
    #[serde(rename = "type")]
    pub type_spec: TypeSpec,
    #[serde(default)]
    pub wire_name: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub is_name_escaped: bool,
    #[serde(default)]
    pub exists_in_base_type: bool,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: Option<DeprecationDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescription {
    pub name: String,
    #[serde(default = "default_method_kind")]
    pub kind: MethodKind,
    #[serde(default)]
    pub return_type: Option<TypeSpec>,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub http_method: Option<HttpMethod>,
    #[serde(default)]
    pub accepted_response_types: Vec<String>,
    #[serde(default)]
    pub request_body_content_type: Option<String>,
    /// Status code pattern to error type
    #[serde(default)]
    pub error_mappings: BTreeMap<String, TypeSpec>,
    #[serde(default)]
    pub accessed_property: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub serializer_modules: Vec<String>,
    #[serde(default)]
    pub deserializer_modules: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: Option<DeprecationDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescription {
    pub name: String,
    #[serde(default = "default_parameter_kind")]
    pub kind: ParameterKind,
    #[serde(rename = "type")]
    pub type_spec: TypeSpec,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub serialization_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerDescription {
    pub key_name: String,
    pub key_type: TypeSpec,
    #[serde(default)]
    pub serialization_name: Option<String>,
    pub return_type: TypeSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumOptionSpec {
    Name(String),
    Full {
        name: String,
        #[serde(default, rename = "wireName")]
        wire_name: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescription {
    pub name: String,
    #[serde(default)]
    pub options: Vec<EnumOptionSpec>,
    #[serde(default)]
    pub flags: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_class_kind() -> ClassKind {
    ClassKind::Model
}

fn default_interface_kind() -> InterfaceKind {
    InterfaceKind::Model
}

fn default_property_kind() -> PropertyKind {
    PropertyKind::Custom
}

fn default_method_kind() -> MethodKind {
    MethodKind::Custom
}

fn default_parameter_kind() -> ParameterKind {
    ParameterKind::Custom
}

/// Parse a description document and build its tree
pub fn parse_description(json: &str) -> Result<CodeTree> {
    let description: Description = serde_json::from_str(json)?;
    load_description(&description)
}

/// Build and validate the tree of an already deserialized description
pub fn load_description(description: &Description) -> Result<CodeTree> {
    let mut loader = Loader {
        tree: CodeTree::with_root_namespace(description.root_namespace.clone()),
        by_qualified_name: HashMap::new(),
        by_simple_name: HashMap::new(),
        classes: Vec::new(),
        interfaces: Vec::new(),
    };
    let root = loader.tree.root();
    loader.declare_contents(root, &description.contents)?;
    loader.link()?;

    let tree = loader.tree;
    tree.validate()?;
    debug!(elements = tree.len(), classes = tree.classes().len(), "loaded description");
    Ok(tree)
}

struct Loader<'d> {
    tree: CodeTree,
    by_qualified_name: HashMap<String, ElementId>,
    /// Folded simple name to every declaration using it
    by_simple_name: HashMap<String, Vec<ElementId>>,
    classes: Vec<(ElementId, &'d ClassDescription)>,
    interfaces: Vec<(ElementId, &'d InterfaceDescription)>,
}

impl<'d> Loader<'d> {
    // ------------------------------------------------------------------
    // Phase 1: declarations
    // ------------------------------------------------------------------

    fn declare_contents(&mut self, parent: ElementId, contents: &'d NamespaceContents) -> Result<()> {
        for namespace in &contents.namespaces {
            let id = self
                .tree
                .add_child(parent, NewElement::namespace(namespace.name.clone()))?;
            self.declare_contents(id, &namespace.contents)?;
        }
        for class in &contents.classes {
            self.declare_class(parent, class)?;
        }
        for interface in &contents.interfaces {
            let element = NewElement::interface(
                interface.name.clone(),
                InterfaceData::new(interface.kind),
            );
            let id = self.declare(parent, with_docs(element, &interface.description, &None))?;
            self.interfaces.push((id, interface));
        }
        for enumeration in &contents.enums {
            let data = EnumData {
                options: enumeration.options.iter().map(enum_option).collect(),
                flags: enumeration.flags,
            };
            let element = NewElement::enumeration(enumeration.name.clone(), data);
            self.declare(parent, with_docs(element, &enumeration.description, &None))?;
        }
        Ok(())
    }

    fn declare_class(&mut self, parent: ElementId, class: &'d ClassDescription) -> Result<()> {
        let mut data = ClassData::new(class.kind);
        data.is_error_type = class.is_error_type;
        let element = NewElement::class(class.name.clone(), data);
        let id = self.declare(parent, with_docs(element, &class.description, &class.deprecated))?;
        self.classes.push((id, class));
        for inner in &class.inner_classes {
            self.declare_class(id, inner)?;
        }
        Ok(())
    }

    fn declare(&mut self, parent: ElementId, element: NewElement) -> Result<ElementId> {
        let simple = fold(&element.name);
        let id = self.tree.add_child(parent, element)?;
        self.by_qualified_name
            .insert(fold(&self.tree.qualified_name(id)), id);
        self.by_simple_name.entry(simple).or_default().push(id);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Phase 2: references and members
    // ------------------------------------------------------------------

    fn link(&mut self) -> Result<()> {
        let classes = std::mem::take(&mut self.classes);
        for (id, class) in &classes {
            self.link_class(*id, class)?;
        }
        let interfaces = std::mem::take(&mut self.interfaces);
        for (id, interface) in &interfaces {
            let contracts = self.resolve_all(*id, &interface.implements)?;
            if let Some(data) = self.tree.interface_mut(*id) {
                for contract in contracts {
                    data.implements.add(contract);
                }
            }
            self.add_members(*id, &interface.properties, &interface.methods)?;
        }
        Ok(())
    }

    fn link_class(&mut self, id: ElementId, class: &ClassDescription) -> Result<()> {
        let base = class
            .base
            .as_ref()
            .map(|spec| self.resolve(id, spec))
            .transpose()?;
        let contracts = self.resolve_all(id, &class.implements)?;
        let composed = class
            .composed
            .as_ref()
            .map(|composed| self.resolve_composed(id, composed))
            .transpose()?;
        let discriminator = match &class.discriminator {
            Some(description) => {
                let mut info = DiscriminatorInfo::new(description.property_name.clone());
                for (key, spec) in &description.mappings {
                    info.add_mapping(key.clone(), self.resolve(id, spec)?);
                }
                Some(info)
            }
            None => None,
        };

        let qualified = self.tree.qualified_name(id);
        let data = self.tree.class_mut(id).ok_or_else(|| {
            Error::Description(format!("{qualified} was declared as a class"))
        })?;
        data.base_type = base;
        for contract in contracts {
            data.implements.add(contract);
        }
        data.original_composed_type = composed;
        if let Some(discriminator) = discriminator {
            data.discriminator = discriminator;
        }

        self.add_members(id, &class.properties, &class.methods)?;

        if let Some(indexer) = &class.indexer {
            let mut data = IndexerData::new(
                indexer.key_name.clone(),
                self.resolve(id, &indexer.key_type)?,
                self.resolve(id, &indexer.return_type)?,
            );
            if let Some(name) = &indexer.serialization_name {
                data = data.with_serialization_name(name.clone());
            }
            self.tree.assign_indexer(id, data)?;
        }
        Ok(())
    }

    fn add_members(
        &mut self,
        owner: ElementId,
        properties: &[PropertyDescription],
        methods: &[MethodDescription],
    ) -> Result<()> {
        for property in properties {
            let type_ref = self.resolve(owner, &property.type_spec)?;
            let wire_name = property
                .wire_name
                .clone()
                .unwrap_or_else(|| property.name.clone());
            let mut data = PropertyData::new(property.kind, type_ref, wire_name);
            data.default_value = property.default_value.clone();
            data.read_only = property.read_only;
            data.is_name_escaped = property.is_name_escaped;
            data.exists_in_base_type = property.exists_in_base_type;
            data.access = property.access;
            let element = NewElement::property(property.name.clone(), data);
            self.tree.add_child(
                owner,
                with_docs(element, &property.description, &property.deprecated),
            )?;
        }

        for method in methods {
            let data = self.method_data(owner, method)?;
            let element = NewElement::method(method.name.clone(), data);
            let id = self.tree.add_child(
                owner,
                with_docs(element, &method.description, &method.deprecated),
            )?;
            let mut parameters = Vec::with_capacity(method.parameters.len());
            for parameter in &method.parameters {
                let mut data = ParameterData::new(parameter.kind, self.resolve(owner, &parameter.type_spec)?);
                data.optional = parameter.optional;
                data.default_value = parameter.default_value.clone();
                data.serialization_name = parameter.serialization_name.clone();
                let element = NewElement::parameter(parameter.name.clone(), data);
                parameters.push(with_docs(element, &parameter.description, &None));
            }
            self.tree.add_children(id, parameters)?;
        }
        Ok(())
    }

    fn method_data(&self, owner: ElementId, method: &MethodDescription) -> Result<MethodData> {
        let mut data = MethodData::new(method.kind);
        data.return_type = method
            .return_type
            .as_ref()
            .map(|spec| self.resolve(owner, spec))
            .transpose()?;
        data.access = method.access;
        data.is_async = method.is_async;
        data.is_static = method.is_static;
        data.http_method = method.http_method;
        data.accepted_response_types = method.accepted_response_types.clone();
        data.request_body_content_type = method.request_body_content_type.clone();
        for (code, spec) in &method.error_mappings {
            data.error_mappings
                .insert(code.clone(), self.resolve(owner, spec)?);
        }
        data.accessed_property = method.accessed_property.clone();
        data.base_url = method.base_url.clone();
        data.serializer_modules = method.serializer_modules.clone();
        data.deserializer_modules = method.deserializer_modules.clone();
        Ok(data)
    }

    // ------------------------------------------------------------------
    // Name resolution
    // ------------------------------------------------------------------

    fn resolve_all(&self, from: ElementId, specs: &[TypeSpec]) -> Result<Vec<TypeReference>> {
        specs.iter().map(|spec| self.resolve(from, spec)).collect()
    }

    fn resolve(&self, from: ElementId, spec: &TypeSpec) -> Result<TypeReference> {
        match spec {
            TypeSpec::Name(name) => self.resolve_name(from, name),
            TypeSpec::Full(description) => {
                let base = match &description.composed {
                    Some(composed) => TypeReference::composed(self.resolve_composed(from, composed)?),
                    None if description.external => TypeReference::external(description.name.clone()),
                    None => self.resolve_name(from, &description.name)?,
                };
                Ok(base
                    .with_collection(description.collection)
                    .with_nullable(description.nullable))
            }
        }
    }

    fn resolve_composed(&self, from: ElementId, composed: &ComposedDescription) -> Result<ComposedType> {
        let members = self.resolve_all(from, &composed.members)?;
        Ok(ComposedType::new(composed.name.clone(), composed.mode, members)?)
    }

    /// Qualified name first, then a simple name that is unique in the tree
    fn resolve_name(&self, from: ElementId, name: &str) -> Result<TypeReference> {
        if let Some(id) = self.by_qualified_name.get(&fold(name)) {
            return Ok(TypeReference::declared(self.tree[*id].name(), *id));
        }
        match self.by_simple_name.get(&fold(name)).map(Vec::as_slice) {
            Some([id]) => Ok(TypeReference::declared(self.tree[*id].name(), *id)),
            Some(candidates) if candidates.len() > 1 => Err(Error::Description(format!(
                "type name `{name}` used by `{}` is ambiguous; qualify it",
                self.tree.qualified_name(from)
            ))),
            _ if is_primitive_name(name) => Ok(TypeReference::primitive(name)),
            _ => Err(Error::Structural(sdkgen_dom::Error::DanglingReference {
                from: self.tree.qualified_name(from),
                target: name.to_string(),
            })),
        }
    }
}

fn enum_option(spec: &EnumOptionSpec) -> EnumOption {
    match spec {
        EnumOptionSpec::Name(name) => EnumOption {
            name: name.clone(),
            wire_name: name.clone(),
        },
        EnumOptionSpec::Full { name, wire_name } => EnumOption {
            name: name.clone(),
            wire_name: wire_name.clone().unwrap_or_else(|| name.clone()),
        },
    }
}

fn with_docs(
    mut element: NewElement,
    description: &Option<String>,
    deprecated: &Option<DeprecationDescription>,
) -> NewElement {
    if let Some(description) = description {
        element = element.with_description(description.clone());
    }
    if let Some(deprecated) = deprecated {
        element = element.with_deprecation(Deprecation {
            message: deprecated.message.clone(),
            since: deprecated.since.clone(),
            removal_date: deprecated.removal_date.clone(),
        });
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_full_type_specs() {
        let json = r#"{
            "namespaces": [{
                "name": "models",
                "classes": [
                    { "name": "Pet", "properties": [
                        { "name": "name", "type": "string" },
                        { "name": "tags", "type": { "name": "string", "collection": "Array" } },
                        { "name": "owner", "type": { "name": "Owner", "external": true } }
                    ]}
                ]
            }]
        }"#;
        let tree = parse_description(json).unwrap();
        let pet = tree.classes()[0];
        assert_eq!(tree.qualified_name(pet), "models.Pet");

        let tags = tree.find_child(pet, "tags").and_then(|id| tree.property(id)).unwrap();
        assert!(tags.type_ref.is_collection());
        assert!(tags.type_ref.is_primitive());

        let owner = tree.find_child(pet, "owner").and_then(|id| tree.property(id)).unwrap();
        assert!(owner.type_ref.is_external());
    }

    #[test]
    fn test_unknown_type_is_dangling() {
        let json = r#"{ "classes": [
            { "name": "Pet", "properties": [ { "name": "owner", "type": "Owner" } ] }
        ]}"#;
        let err = parse_description(json).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(sdkgen_dom::Error::DanglingReference { ref target, .. }) if target == "Owner"
        ));
    }

    #[test]
    fn test_ambiguous_simple_name_is_rejected() {
        let json = r#"{
            "namespaces": [
                { "name": "a", "classes": [ { "name": "Item" } ] },
                { "name": "b", "classes": [ { "name": "Item" } ] }
            ],
            "classes": [ { "name": "Holder", "properties": [ { "name": "item", "type": "Item" } ] } ]
        }"#;
        assert!(matches!(parse_description(json), Err(Error::Description(_))));

        let qualified = json.replace(r#""type": "Item""#, r#""type": "b.Item""#);
        assert!(parse_description(&qualified).is_ok());
    }
}
