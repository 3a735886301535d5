//! Reference interpreter for synthesized model programs
//!
//! Runs factory, deserializer and serializer programs against a [`ParseNode`]
//! and a [`SerializationWriter`]. Backends compare their generated code with
//! what this interpreter does on the same input.

use std::cell::Cell;
use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use sdkgen_dom::names::eq_ignore_case;
use sdkgen_dom::{CodeTree, ElementData, ElementId, MethodKind, PropertyKind};

use crate::error::{Error, Result};
use crate::synthesis::{
    Binding, Guard, Instruction, Operand, TreeSynthesis, ValueAccess, ValueShape,
};

/// Read side of a serialized payload
pub trait ParseNode: Sized {
    fn child(&self, name: &str) -> Option<Self>;

    /// Field names of an object node, in document order
    fn field_names(&self) -> Vec<String>;

    /// Items of an array node
    fn elements(&self) -> Option<Vec<Self>>;

    /// Scalar content; `None` for objects, arrays and null
    fn scalar_value(&self) -> Option<Json>;

    fn is_object(&self) -> bool;

    /// The node as-is, for additional data
    fn raw_value(&self) -> Json;

    fn string_value(&self) -> Option<String> {
        match self.scalar_value()? {
            Json::String(s) => Some(s),
            _ => None,
        }
    }

    fn child_string_value(&self, name: &str) -> Option<String> {
        self.child(name)?.string_value()
    }
}

/// [`ParseNode`] over a borrowed `serde_json::Value`
#[derive(Debug, Clone, Copy)]
pub struct JsonParseNode<'a>(pub &'a Json);

impl<'a> ParseNode for JsonParseNode<'a> {
    fn child(&self, name: &str) -> Option<Self> {
        self.0.as_object()?.get(name).map(JsonParseNode)
    }

    fn field_names(&self) -> Vec<String> {
        self.0
            .as_object()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn elements(&self) -> Option<Vec<Self>> {
        Some(self.0.as_array()?.iter().map(JsonParseNode).collect())
    }

    fn scalar_value(&self) -> Option<Json> {
        match self.0 {
            Json::Null | Json::Array(_) | Json::Object(_) => None,
            scalar => Some(scalar.clone()),
        }
    }

    fn is_object(&self) -> bool {
        self.0.is_object()
    }

    fn raw_value(&self) -> Json {
        self.0.clone()
    }
}

/// Write side of a serialized payload.
///
/// `start_object(None)` while an object is open writes the following fields
/// into that object. A value written with no key inside an object becomes the
/// object's whole payload.
pub trait SerializationWriter {
    fn start_object(&mut self, key: Option<&str>);
    fn end_object(&mut self);
    fn start_collection(&mut self, key: Option<&str>);
    fn end_collection(&mut self);
    fn write_scalar(&mut self, key: Option<&str>, value: &Json);
    fn write_enum(&mut self, key: Option<&str>, value: &str);
    fn write_additional_data(&mut self, data: &BTreeMap<String, Json>);
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriterEvent {
    StartObject(Option<String>),
    EndObject,
    StartCollection(Option<String>),
    EndCollection,
    Scalar(Option<String>, Json),
    Enum(Option<String>, String),
    AdditionalData(BTreeMap<String, Json>),
}

/// Records every writer call; [`RecordingWriter::to_json`] replays them
#[derive(Debug, Default, Clone)]
pub struct RecordingWriter {
    pub events: Vec<WriterEvent>,
}

enum Frame {
    Object {
        key: Option<String>,
        fields: Map<String, Json>,
        payload: Option<Json>,
    },
    Collection {
        key: Option<String>,
        items: Vec<Json>,
    },
    Inline,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<Json> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut root: Option<Json> = None;

        for event in &self.events {
            match event {
                WriterEvent::StartObject(key) => {
                    let inside_object = matches!(open_frame(&mut frames), Some(Frame::Object { .. }));
                    if key.is_none() && inside_object {
                        frames.push(Frame::Inline);
                    } else {
                        frames.push(Frame::Object {
                            key: key.clone(),
                            fields: Map::new(),
                            payload: None,
                        });
                    }
                }
                WriterEvent::EndObject => match frames.pop() {
                    Some(Frame::Inline) => {}
                    Some(Frame::Object {
                        key,
                        fields,
                        payload,
                    }) => {
                        let value = match payload {
                            Some(payload) if fields.is_empty() => payload,
                            _ => Json::Object(fields),
                        };
                        attach(&mut frames, &mut root, key.as_deref(), value);
                    }
                    _ => return Err(unbalanced("end_object")),
                },
                WriterEvent::StartCollection(key) => frames.push(Frame::Collection {
                    key: key.clone(),
                    items: Vec::new(),
                }),
                WriterEvent::EndCollection => match frames.pop() {
                    Some(Frame::Collection { key, items }) => {
                        attach(&mut frames, &mut root, key.as_deref(), Json::Array(items));
                    }
                    _ => return Err(unbalanced("end_collection")),
                },
                WriterEvent::Scalar(key, value) => {
                    attach(&mut frames, &mut root, key.as_deref(), value.clone());
                }
                WriterEvent::Enum(key, value) => {
                    attach(&mut frames, &mut root, key.as_deref(), Json::String(value.clone()));
                }
                WriterEvent::AdditionalData(data) => {
                    for (key, value) in data {
                        attach(&mut frames, &mut root, Some(key), value.clone());
                    }
                }
            }
        }
        if !frames.is_empty() {
            return Err(unbalanced("end of stream"));
        }
        Ok(root.unwrap_or(Json::Null))
    }
}

fn unbalanced(at: &str) -> Error {
    Error::Evaluation(format!("unbalanced writer events at {at}"))
}

/// Innermost frame that values are written into
fn open_frame(frames: &mut [Frame]) -> Option<&mut Frame> {
    frames.iter_mut().rev().find(|f| !matches!(f, Frame::Inline))
}

fn attach(frames: &mut [Frame], root: &mut Option<Json>, key: Option<&str>, value: Json) {
    match (open_frame(frames), key) {
        (Some(Frame::Object { fields, .. }), Some(key)) => {
            fields.insert(key.to_string(), value);
        }
        (Some(Frame::Object { payload, .. }), None) => *payload = Some(value),
        (Some(Frame::Collection { items, .. }), _) => items.push(value),
        (Some(Frame::Inline), _) | (None, _) => *root = Some(value),
    }
}

impl SerializationWriter for RecordingWriter {
    fn start_object(&mut self, key: Option<&str>) {
        self.events.push(WriterEvent::StartObject(key.map(str::to_string)));
    }

    fn end_object(&mut self) {
        self.events.push(WriterEvent::EndObject);
    }

    fn start_collection(&mut self, key: Option<&str>) {
        self.events
            .push(WriterEvent::StartCollection(key.map(str::to_string)));
    }

    fn end_collection(&mut self) {
        self.events.push(WriterEvent::EndCollection);
    }

    fn write_scalar(&mut self, key: Option<&str>, value: &Json) {
        self.events
            .push(WriterEvent::Scalar(key.map(str::to_string), value.clone()));
    }

    fn write_enum(&mut self, key: Option<&str>, value: &str) {
        self.events.push(WriterEvent::Enum(
            key.map(str::to_string),
            value.to_string(),
        ));
    }

    fn write_additional_data(&mut self, data: &BTreeMap<String, Json>) {
        if !data.is_empty() {
            self.events.push(WriterEvent::AdditionalData(data.clone()));
        }
    }
}

/// A value held by an instance slot
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Json),
    Enum(String),
    Collection(Vec<Value>),
    Object(Instance),
}

impl Value {
    /// Untyped conversion, used for types declared outside the tree
    pub fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Null => None,
            Json::Array(items) => Some(Value::Collection(
                items.iter().filter_map(Value::from_json).collect(),
            )),
            Json::Object(fields) => Some(Value::Object(Instance {
                class: None,
                type_name: String::new(),
                slots: fields
                    .iter()
                    .filter_map(|(k, v)| Some((k.clone(), Value::from_json(v)?)))
                    .collect(),
                additional_data: BTreeMap::new(),
            })),
            scalar => Some(Value::Scalar(scalar.clone())),
        }
    }

    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }
}

/// A model object produced by a factory
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// `None` for types declared outside the tree
    pub class: Option<ElementId>,
    pub type_name: String,
    /// Property name to value
    pub slots: BTreeMap<String, Value>,
    pub additional_data: BTreeMap<String, Json>,
}

impl Instance {
    pub fn new(class: Option<ElementId>, type_name: impl Into<String>) -> Self {
        Self {
            class,
            type_name: type_name.into(),
            slots: BTreeMap::new(),
            additional_data: BTreeMap::new(),
        }
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.slots.get(property)
    }

    pub fn is_populated(&self, property: &str) -> bool {
        self.slots.contains_key(property)
    }

    pub fn populated(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    fn at_path_mut(&mut self, path: &[String]) -> Option<&mut Instance> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => match self.slots.get_mut(head) {
                Some(Value::Object(inner)) => inner.at_path_mut(rest),
                _ => None,
            },
        }
    }
}

/// Where a wire field lands: `property` of the instance reached through `path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTarget {
    pub path: Vec<String>,
    pub property: String,
    pub shape: ValueShape,
}

/// Wire name to target
pub type FieldMap = BTreeMap<String, FieldTarget>;

#[derive(Default)]
struct FactoryState {
    discriminator: Option<String>,
    result: Option<Instance>,
    pending: Option<Value>,
}

/// Default limit on nested objects read or written by one call
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub struct Interpreter<'a> {
    tree: &'a CodeTree,
    synthesis: &'a TreeSynthesis,
    max_depth: usize,
    depth: Cell<usize>,
}

impl<'a> Interpreter<'a> {
    pub fn new(tree: &'a CodeTree, synthesis: &'a TreeSynthesis) -> Self {
        Self {
            tree,
            synthesis,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run `f` one object level deeper, failing past `max_depth`
    fn nested<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(Error::Evaluation(format!(
                "objects nested deeper than {} levels",
                self.max_depth
            )));
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    fn program(&self, class: ElementId, kind: MethodKind) -> Option<&'a [Instruction]> {
        self.synthesis
            .program(class, kind)
            .map(|program| program.body.as_slice())
    }

    fn class_name(&self, class: ElementId) -> Result<String> {
        match self.tree.get(class).map(|e| e.data()) {
            Some(ElementData::Class(_)) => Ok(self.tree[class].name().to_string()),
            _ => Err(Error::Evaluation(format!(
                "{} is not a class",
                self.tree.qualified_name(class)
            ))),
        }
    }

    /// Run the factory of `class` against `node`
    pub fn create<N: ParseNode>(&self, class: ElementId, node: &N) -> Result<Instance> {
        let name = self.class_name(class)?;
        let Some(body) = self.program(class, MethodKind::Factory) else {
            return Ok(Instance::new(Some(class), name));
        };
        let mut state = FactoryState::default();
        match self.run_factory(body, node, &mut state)? {
            Some(instance) => Ok(instance),
            None => state.result.ok_or_else(|| {
                Error::Evaluation(format!("factory of {name} produced no instance"))
            }),
        }
    }

    fn run_factory<N: ParseNode>(
        &self,
        body: &[Instruction],
        node: &N,
        state: &mut FactoryState,
    ) -> Result<Option<Instance>> {
        for instruction in body {
            match instruction {
                Instruction::ReadDiscriminator { property } => {
                    state.discriminator = node.child_string_value(property);
                }
                Instruction::Construct {
                    type_name,
                    target,
                    bind,
                } => {
                    let instance = Instance::new(*target, type_name.clone());
                    match bind {
                        Binding::Return => return Ok(Some(instance)),
                        Binding::Result => state.result = Some(instance),
                        Binding::Slot(property) => {
                            result_of(state)?
                                .slots
                                .insert(property.clone(), Value::Object(instance));
                        }
                    }
                }
                Instruction::Branch { arms, otherwise } => {
                    let mut taken = None;
                    for arm in arms {
                        if self.factory_guard(&arm.guard, node, state)? {
                            taken = Some(&arm.body);
                            break;
                        }
                    }
                    let chosen = taken.unwrap_or(otherwise);
                    if let Some(instance) = self.run_factory(chosen, node, state)? {
                        return Ok(Some(instance));
                    }
                }
                Instruction::AssignReadValue { property } => {
                    let value = state.pending.take().ok_or_else(|| {
                        Error::Evaluation(format!("no value read for {property}"))
                    })?;
                    result_of(state)?.slots.insert(property.clone(), value);
                }
                Instruction::Return {
                    value: Operand::Result,
                } => return Ok(state.result.take()),
                other => return Err(unexpected("factory", other)),
            }
        }
        Ok(None)
    }

    fn factory_guard<N: ParseNode>(
        &self,
        guard: &Guard,
        node: &N,
        state: &mut FactoryState,
    ) -> Result<bool> {
        match guard {
            Guard::DiscriminatorEquals { key } => Ok(state
                .discriminator
                .as_deref()
                .is_some_and(|value| eq_ignore_case(value, key))),
            Guard::ValuePresent { shape } => {
                state.pending = self.read_value(node, shape)?;
                Ok(state.pending.is_some())
            }
            Guard::PropertyPopulated { property } => Ok(state
                .result
                .as_ref()
                .is_some_and(|r| r.is_populated(property))),
            Guard::AnyPopulated { properties } => Ok(state
                .result
                .as_ref()
                .is_some_and(|r| properties.iter().any(|p| r.is_populated(p)))),
        }
    }

    /// Field map of `instance`, following delegation to bases and members
    pub fn field_map(&self, instance: &Instance) -> Result<FieldMap> {
        match instance.class {
            Some(class) => self.class_field_map(class, instance, &[]),
            None => Ok(FieldMap::new()),
        }
    }

    fn class_field_map(
        &self,
        class: ElementId,
        receiver: &Instance,
        path: &[String],
    ) -> Result<FieldMap> {
        let Some(body) = self.program(class, MethodKind::Deserializer) else {
            return Ok(FieldMap::new());
        };
        let mut map = FieldMap::new();
        Ok(self
            .run_deserializer(class, body, receiver, path, &mut map)?
            .unwrap_or(map))
    }

    fn run_deserializer(
        &self,
        class: ElementId,
        body: &[Instruction],
        receiver: &Instance,
        path: &[String],
        map: &mut FieldMap,
    ) -> Result<Option<FieldMap>> {
        for instruction in body {
            match instruction {
                Instruction::DelegateToBase => {
                    if let Some(base) = self.tree.base_class(class) {
                        // entries inserted later win
                        let base_map = self.class_field_map(base, receiver, path)?;
                        for (wire_name, target) in base_map {
                            map.entry(wire_name).or_insert(target);
                        }
                    }
                }
                Instruction::FieldMapEntry {
                    wire_name,
                    property,
                    shape,
                } => {
                    map.insert(
                        wire_name.clone(),
                        FieldTarget {
                            path: path.to_vec(),
                            property: property.clone(),
                            shape: shape.clone(),
                        },
                    );
                }
                Instruction::Branch { arms, otherwise } => {
                    let chosen = arms
                        .iter()
                        .find(|arm| receiver_guard(&arm.guard, receiver))
                        .map_or(otherwise, |arm| &arm.body);
                    if let Some(done) = self.run_deserializer(class, chosen, receiver, path, map)? {
                        return Ok(Some(done));
                    }
                }
                Instruction::DelegateToMember { property } => {
                    return match receiver.get(property) {
                        Some(Value::Object(member)) => {
                            Ok(Some(self.member_field_map(member, path, property)?))
                        }
                        _ => Ok(Some(FieldMap::new())),
                    };
                }
                Instruction::MergeFacets { properties } => {
                    let mut merged = FieldMap::new();
                    for property in properties {
                        if let Some(Value::Object(facet)) = receiver.get(property) {
                            merged.extend(self.member_field_map(facet, path, property)?);
                        }
                    }
                    return Ok(Some(merged));
                }
                Instruction::Return { value } => match value {
                    Operand::FieldMap => return Ok(Some(std::mem::take(map))),
                    Operand::EmptyFieldMap => return Ok(Some(FieldMap::new())),
                    other => {
                        return Err(Error::Evaluation(format!(
                            "deserializer cannot return {other:?}"
                        )))
                    }
                },
                other => return Err(unexpected("deserializer", other)),
            }
        }
        Ok(None)
    }

    fn member_field_map(
        &self,
        member: &Instance,
        path: &[String],
        property: &str,
    ) -> Result<FieldMap> {
        let Some(class) = member.class else {
            return Ok(FieldMap::new());
        };
        let mut member_path = path.to_vec();
        member_path.push(property.to_string());
        self.class_field_map(class, member, &member_path)
    }

    /// Factory, then field map, then every field of `node`
    pub fn deserialize<N: ParseNode>(&self, class: ElementId, node: &N) -> Result<Instance> {
        let mut instance = self.create(class, node)?;
        if !node.is_object() {
            return Ok(instance);
        }
        let fields = self.field_map(&instance)?;
        let keeps_additional_data = instance.class.is_some_and(|class| {
            std::iter::once(class)
                .chain(self.tree.base_chain(class))
                .any(|c| {
                    self.tree
                        .property_of_kind(c, &[PropertyKind::AdditionalData])
                        .is_some()
                })
        });

        for name in node.field_names() {
            let Some(child) = node.child(&name) else {
                continue;
            };
            match fields.get(&name) {
                Some(target) => {
                    let Some(value) = self.read_value(&child, &target.shape)? else {
                        continue;
                    };
                    let receiver = instance.at_path_mut(&target.path).ok_or_else(|| {
                        Error::Evaluation(format!("no receiver for field {name}"))
                    })?;
                    receiver.slots.insert(target.property.clone(), value);
                }
                None if keeps_additional_data => {
                    instance.additional_data.insert(name, child.raw_value());
                }
                None => {}
            }
        }
        Ok(instance)
    }

    fn read_value<N: ParseNode>(&self, node: &N, shape: &ValueShape) -> Result<Option<Value>> {
        let value = match shape.access {
            ValueAccess::Primitive => node.scalar_value().map(Value::Scalar),
            ValueAccess::Enum => node
                .string_value()
                .filter(|s| self.is_enum_option(shape.target, s))
                .map(Value::Enum),
            ValueAccess::Object => {
                if !node.is_object() {
                    return Ok(None);
                }
                self.read_object(node, shape)?
            }
            ValueAccess::CollectionOfPrimitive => node.elements().map(|items| {
                Value::Collection(
                    items
                        .iter()
                        .filter_map(|item| item.scalar_value().map(Value::Scalar))
                        .collect(),
                )
            }),
            ValueAccess::CollectionOfEnum => {
                let names: Option<Vec<String>> = match node.elements() {
                    Some(items) => Some(items.iter().filter_map(N::string_value).collect()),
                    None => node
                        .string_value()
                        .map(|s| s.split(',').map(|v| v.trim().to_string()).collect()),
                };
                names.map(|names| {
                    Value::Collection(
                        names
                            .into_iter()
                            .filter(|s| self.is_enum_option(shape.target, s))
                            .map(Value::Enum)
                            .collect(),
                    )
                })
            }
            ValueAccess::CollectionOfObject => match node.elements() {
                Some(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items.iter().filter(|item| item.is_object()) {
                        if let Some(value) = self.read_object(item, shape)? {
                            values.push(value);
                        }
                    }
                    Some(Value::Collection(values))
                }
                None => None,
            },
        };
        Ok(value)
    }

    fn read_object<N: ParseNode>(&self, node: &N, shape: &ValueShape) -> Result<Option<Value>> {
        match shape.target {
            Some(target) if self.tree.class(target).is_some() => {
                let instance = self.nested(|| self.deserialize(target, node))?;
                Ok(Some(Value::Object(instance)))
            }
            _ => Ok(Value::from_json(&node.raw_value())),
        }
    }

    fn is_enum_option(&self, target: Option<ElementId>, value: &str) -> bool {
        match target.and_then(|id| self.tree.get(id)).and_then(|e| e.as_enum()) {
            Some(data) => data
                .options
                .iter()
                .any(|option| eq_ignore_case(&option.wire_name, value)),
            None => true,
        }
    }

    /// Write `instance` as the root object
    pub fn serialize<W: SerializationWriter>(&self, instance: &Instance, writer: &mut W) -> Result<()> {
        writer.start_object(None);
        self.serialize_into(instance, writer)?;
        writer.end_object();
        Ok(())
    }

    fn serialize_into<W: SerializationWriter>(&self, instance: &Instance, writer: &mut W) -> Result<()> {
        match instance.class {
            Some(class) => self.run_serializer(class, instance, writer),
            None => {
                for (key, value) in &instance.slots {
                    self.write_value(Some(key), value, writer)?;
                }
                Ok(())
            }
        }
    }

    fn run_serializer<W: SerializationWriter>(
        &self,
        class: ElementId,
        receiver: &Instance,
        writer: &mut W,
    ) -> Result<()> {
        match self.program(class, MethodKind::Serializer) {
            Some(body) => self.run_serializer_body(class, body, receiver, writer),
            None => Ok(()),
        }
    }

    fn run_serializer_body<W: SerializationWriter>(
        &self,
        class: ElementId,
        body: &[Instruction],
        receiver: &Instance,
        writer: &mut W,
    ) -> Result<()> {
        for instruction in body {
            match instruction {
                Instruction::DelegateToBase => {
                    if let Some(base) = self.tree.base_class(class) {
                        self.run_serializer(base, receiver, writer)?;
                    }
                }
                Instruction::WriteValue {
                    wire_name,
                    properties,
                    ..
                } => {
                    for property in properties {
                        if let Some(value) = receiver.get(property) {
                            self.write_value(wire_name.as_deref(), value, writer)?;
                        }
                    }
                }
                Instruction::WriteAdditionalData { .. } => {
                    writer.write_additional_data(&receiver.additional_data);
                }
                Instruction::Branch { arms, otherwise } => {
                    let chosen = arms
                        .iter()
                        .find(|arm| receiver_guard(&arm.guard, receiver))
                        .map_or(otherwise, |arm| &arm.body);
                    self.run_serializer_body(class, chosen, receiver, writer)?;
                }
                other => return Err(unexpected("serializer", other)),
            }
        }
        Ok(())
    }

    fn write_value<W: SerializationWriter>(
        &self,
        key: Option<&str>,
        value: &Value,
        writer: &mut W,
    ) -> Result<()> {
        match value {
            Value::Scalar(scalar) => writer.write_scalar(key, scalar),
            Value::Enum(name) => writer.write_enum(key, name),
            Value::Collection(items) => {
                writer.start_collection(key);
                for item in items {
                    self.write_value(None, item, writer)?;
                }
                writer.end_collection();
            }
            Value::Object(instance) => {
                writer.start_object(key);
                self.nested(|| self.serialize_into(instance, writer))?;
                writer.end_object();
            }
        }
        Ok(())
    }
}

fn result_of(state: &mut FactoryState) -> Result<&mut Instance> {
    state
        .result
        .as_mut()
        .ok_or_else(|| Error::Evaluation("result used before construction".to_string()))
}

fn receiver_guard(guard: &Guard, receiver: &Instance) -> bool {
    match guard {
        Guard::PropertyPopulated { property } => receiver.is_populated(property),
        Guard::AnyPopulated { properties } => properties.iter().any(|p| receiver.is_populated(p)),
        Guard::DiscriminatorEquals { .. } | Guard::ValuePresent { .. } => false,
    }
}

fn unexpected(program: &str, instruction: &Instruction) -> Error {
    Error::Evaluation(format!("unexpected instruction in {program}: {instruction:?}"))
}
