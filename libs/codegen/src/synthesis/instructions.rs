//! Synthesis instruction set
//!
//! A method body is an ordered list of [`Instruction`]s. Writers render them
//! into concrete syntax; the reference interpreter in [`crate::eval`] executes
//! them. Nothing here carries target-language tokens.

use serde::{Deserialize, Serialize};

use sdkgen_dom::{
    CodeTree, CollectionKind, ElementData, ElementId, HttpMethod, TypeReference, TypeTarget,
};

/// How a value is read from a parse node or handed to a serialization writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAccess {
    Primitive,
    Enum,
    Object,
    CollectionOfPrimitive,
    CollectionOfEnum,
    CollectionOfObject,
}

impl ValueAccess {
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            ValueAccess::CollectionOfPrimitive
                | ValueAccess::CollectionOfEnum
                | ValueAccess::CollectionOfObject
        )
    }
}

/// Access mode plus the type it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueShape {
    pub access: ValueAccess,
    pub type_name: String,
    /// Declaration in the tree, when the type is declared there
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
}

impl ValueShape {
    pub fn of(tree: &CodeTree, type_ref: &TypeReference) -> Self {
        let collection = type_ref.collection != CollectionKind::None;
        let target = type_ref.declared_target();
        let access = match &type_ref.target {
            TypeTarget::Primitive(_) if collection => ValueAccess::CollectionOfPrimitive,
            TypeTarget::Primitive(_) => ValueAccess::Primitive,
            TypeTarget::Composed(_) if collection => ValueAccess::CollectionOfObject,
            TypeTarget::Composed(_) => ValueAccess::Object,
            TypeTarget::Declared(_) => match target.and_then(|id| tree.get(id)).map(|e| e.data()) {
                Some(ElementData::Enum(data)) if collection || data.flags => {
                    ValueAccess::CollectionOfEnum
                }
                Some(ElementData::Enum(_)) => ValueAccess::Enum,
                _ if collection => ValueAccess::CollectionOfObject,
                _ => ValueAccess::Object,
            },
        };
        Self {
            access,
            type_name: type_ref.name().to_string(),
            target,
        }
    }
}

/// Where a constructed instance goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", content = "property", rename_all = "snake_case")]
pub enum Binding {
    /// Returned immediately
    Return,
    /// Kept as the method's result variable
    Result,
    /// Assigned to a property of the result
    Slot(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Guard {
    /// The discriminator value read earlier equals `key`, ignoring case
    DiscriminatorEquals { key: String },
    /// The input node can be read with `shape`; the value is kept for the
    /// following [`Instruction::AssignReadValue`]
    ValuePresent { shape: ValueShape },
    /// The receiver's property holds a value
    PropertyPopulated { property: String },
    /// At least one of the receiver's properties holds a value
    AnyPopulated { properties: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arm {
    pub guard: Guard,
    pub body: Vec<Instruction>,
}

/// How the property is reached during initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAccess {
    Direct,
    Setter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathBinding {
    pub parameter: String,
    pub serialization_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Stream,
    Parsable,
    Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    NoContent,
    Primitive,
    Collection,
    CollectionOfPrimitive,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMappingEntry {
    /// Upper-cased status code pattern
    pub code: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "value", content = "name", rename_all = "snake_case")]
pub enum Operand {
    /// The result variable
    Result,
    /// The field map built so far
    FieldMap,
    EmptyFieldMap,
    RequestInfo,
    Parameter(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    // --- model side ---
    /// Read the discriminator value once from the input node
    ReadDiscriminator { property: String },
    Construct {
        type_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<ElementId>,
        bind: Binding,
    },
    /// `if / else if / else` chain; the first matching arm runs
    Branch {
        arms: Vec<Arm>,
        otherwise: Vec<Instruction>,
    },
    AssignReadValue { property: String },
    FieldMapEntry {
        wire_name: String,
        property: String,
        shape: ValueShape,
    },
    /// Run the base class's method of the same kind on the same receiver
    DelegateToBase,
    /// Return the field map of the populated member
    DelegateToMember { property: String },
    /// Return the combined field maps of every populated facet
    MergeFacets { properties: Vec<String> },
    /// One write call; `wire_name == None` writes the value(s) as the payload
    WriteValue {
        #[serde(skip_serializing_if = "Option::is_none")]
        wire_name: Option<String>,
        properties: Vec<String>,
        shape: ValueShape,
    },
    WriteAdditionalData { property: String },

    // --- construction ---
    CallBaseConstructor { arguments: Vec<Operand> },
    InitializeProperty {
        property: String,
        access: PropertyAccess,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// Copy the path-parameter map from `parameter` and add the path segments
    MergePathParameters {
        parameter: String,
        segments: Vec<PathBinding>,
    },
    AssignFromParameter { property: String, parameter: String },
    /// Store the raw URL under the reserved path-parameter key
    BindRawUrl { parameter: String, property: String },
    RegisterDefaultSerializer { module: String },
    RegisterDefaultDeserializer { module: String },
    SetBaseUrl {
        adapter: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path_parameters: Option<String>,
    },
    EnableBackingStore { adapter: String, parameter: String },

    // --- request side ---
    NewRequestInfo,
    SetUrlTemplate {
        url_template: String,
        path_parameters: String,
    },
    SetHttpMethod { method: HttpMethod },
    SetAcceptHeader { value: String },
    ApplyRequestConfiguration {
        parameter: String,
        headers: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        query_parameters: Option<String>,
        options: String,
    },
    SetRequestBody {
        parameter: String,
        kind: BodyKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        adapter: Option<String>,
    },
    InvokeGenerator { method: String, arguments: Vec<String> },
    ErrorMapping { entries: Vec<ErrorMappingEntry> },
    Send {
        mode: SendMode,
        #[serde(skip_serializing_if = "Option::is_none")]
        type_name: Option<String>,
    },
    /// Return `to` when the mapper input equals `from`
    MapQueryParameter { from: String, to: String },
    BuildRequestBuilder {
        type_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path_parameters: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        adapter: Option<String>,
        segments: Vec<PathBinding>,
    },

    // --- accessors ---
    ReadField { property: String },
    WriteField { property: String, parameter: String },
    ReadBackingStore {
        store: String,
        key: String,
        /// Materialized and stored when the slot is empty
        #[serde(skip_serializing_if = "Option::is_none")]
        lazy_default: Option<String>,
    },
    WriteBackingStore {
        store: String,
        key: String,
        parameter: String,
    },

    Return { value: Operand },
}

impl Instruction {
    /// Instructions nested directly in branch arms and fallbacks
    pub fn nested(&self) -> Vec<&Instruction> {
        match self {
            Instruction::Branch { arms, otherwise } => arms
                .iter()
                .flat_map(|arm| arm.body.iter())
                .chain(otherwise.iter())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Depth-first walk over a body, nested branch content included
pub fn flatten(body: &[Instruction]) -> Vec<&Instruction> {
    let mut out = Vec::new();
    collect(body.iter(), &mut out);
    out
}

fn collect<'a>(body: impl Iterator<Item = &'a Instruction>, out: &mut Vec<&'a Instruction>) {
    for instruction in body {
        out.push(instruction);
        collect(instruction.nested().into_iter(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkgen_dom::{ClassData, ClassKind, EnumData, NewElement};

    #[test]
    fn shape_follows_declaration_kind() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let color = tree
            .add_child(root, NewElement::enumeration("Color", EnumData::with_options(["red"])))
            .unwrap();
        let pet = tree
            .add_child(root, NewElement::class("Pet", ClassData::new(ClassKind::Model)))
            .unwrap();

        let enum_shape = ValueShape::of(&tree, &TypeReference::declared("Color", color));
        assert_eq!(enum_shape.access, ValueAccess::Enum);

        let pets = TypeReference::declared("Pet", pet).with_collection(CollectionKind::Array);
        assert_eq!(ValueShape::of(&tree, &pets).access, ValueAccess::CollectionOfObject);

        let tags = TypeReference::primitive("string").with_collection(CollectionKind::Array);
        assert_eq!(ValueShape::of(&tree, &tags).access, ValueAccess::CollectionOfPrimitive);
    }

    #[test]
    fn instructions_serialize_with_op_tag() {
        let instruction = Instruction::Construct {
            type_name: "Dog".into(),
            target: None,
            bind: Binding::Slot("dog".into()),
        };
        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(json["op"], "construct");
        assert_eq!(json["bind"]["to"], "slot");
        assert_eq!(json["bind"]["property"], "dog");
    }
}
