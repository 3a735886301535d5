//! Member payloads: properties, methods, parameters, indexers and enums

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::kinds::{Access, HttpMethod, MethodKind, ParameterKind, PropertyKind};
use crate::types::TypeReference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyData {
    pub kind: PropertyKind,
    pub type_ref: TypeReference,
    pub default_value: Option<String>,
    /// Serialized field name
    pub wire_name: String,
    /// The declared name had to be changed from the wire name
    pub is_name_escaped: bool,
    pub read_only: bool,
    /// Re-declaration of a property an ancestor already owns
    pub exists_in_base_type: bool,
    pub access: Access,
}

impl PropertyData {
    pub fn new(kind: PropertyKind, type_ref: TypeReference, wire_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_ref,
            default_value: None,
            wire_name: wire_name.into(),
            is_name_escaped: false,
            read_only: false,
            exists_in_base_type: false,
            access: Access::Public,
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn inherited(mut self) -> Self {
        self.exists_in_base_type = true;
        self
    }

    pub fn escaped(mut self) -> Self {
        self.is_name_escaped = true;
        self
    }

    pub fn has_default(&self) -> bool {
        self.default_value
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }
}

/// Which accessor of a lowered indexer a method is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexerRole {
    /// `by{Key}` accessor
    ByKey,
    /// `with{Key}` accessor kept for backward compatibility
    WithKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerOrigin {
    pub indexer: IndexerData,
    pub role: IndexerRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodData {
    pub kind: MethodKind,
    pub return_type: Option<TypeReference>,
    pub access: Access,
    pub is_async: bool,
    pub is_static: bool,
    pub http_method: Option<HttpMethod>,
    pub accepted_response_types: Vec<String>,
    pub request_body_content_type: Option<String>,
    /// Status code pattern (e.g. `4XX`) to error class
    pub error_mappings: BTreeMap<String, TypeReference>,
    /// Property read or written by a getter/setter
    pub accessed_property: Option<String>,
    pub base_url: Option<String>,
    pub serializer_modules: Vec<String>,
    pub deserializer_modules: Vec<String>,
    /// Set on methods produced by indexer lowering
    pub indexer_origin: Option<IndexerOrigin>,
}

impl MethodData {
    pub fn new(kind: MethodKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn returning(mut self, return_type: TypeReference) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_http_method(mut self, http_method: HttpMethod) -> Self {
        self.http_method = Some(http_method);
        self
    }

    pub fn accessing(mut self, property: impl Into<String>) -> Self {
        self.accessed_property = Some(property.into());
        self
    }

    pub fn is_of_kind(&self, kinds: &[MethodKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterData {
    pub kind: ParameterKind,
    pub type_ref: TypeReference,
    pub optional: bool,
    pub default_value: Option<String>,
    /// Name used in the URL template or on the wire, when it differs
    pub serialization_name: Option<String>,
}

impl ParameterData {
    pub fn new(kind: ParameterKind, type_ref: TypeReference) -> Self {
        Self {
            kind,
            type_ref,
            optional: false,
            default_value: None,
            serialization_name: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_serialization_name(mut self, name: impl Into<String>) -> Self {
        self.serialization_name = Some(name.into());
        self
    }
}

/// Keyed access (`builder[key]`) declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerData {
    pub key_name: String,
    pub key_type: TypeReference,
    /// Name of the key inside the URL template
    pub serialization_name: String,
    pub return_type: TypeReference,
}

impl IndexerData {
    pub fn new(
        key_name: impl Into<String>,
        key_type: TypeReference,
        return_type: TypeReference,
    ) -> Self {
        let key_name = key_name.into();
        Self {
            serialization_name: key_name.clone(),
            key_name,
            key_type,
            return_type,
        }
    }

    pub fn with_serialization_name(mut self, name: impl Into<String>) -> Self {
        self.serialization_name = name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub name: String,
    pub wire_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumData {
    pub options: Vec<EnumOption>,
    /// Values combine as bit flags
    pub flags: bool,
}

impl EnumData {
    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options
                .into_iter()
                .map(|option| {
                    let wire_name = option.into();
                    EnumOption {
                        name: wire_name.clone(),
                        wire_name,
                    }
                })
                .collect(),
            flags: false,
        }
    }
}
