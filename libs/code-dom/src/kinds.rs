//! Kind taxonomy
//!
//! Closed enumerations recording why a declaration exists. Consumers match on
//! them exhaustively; adding a variant is a compile-time obligation for every
//! consumer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Custom,
    RequestBuilder,
    Model,
    QueryParameters,
    /// Single parameter bag for languages without overloads or optional parameters
    ParameterSet,
    /// Placeholder for a barrel/index file
    BarrelInitializer,
    /// Headers, query parameters and middleware options for a request
    RequestConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceKind {
    Model,
    QueryParameters,
    RequestConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKind {
    Custom,
    RequestBuilder,
    AdditionalData,
    BackingStore,
    UrlTemplate,
    PathParameters,
    RequestAdapter,
    QueryParameter,
    QueryParameters,
    Headers,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MethodKind {
    #[default]
    Custom,
    Constructor,
    ClientConstructor,
    RawUrlConstructor,
    Getter,
    Setter,
    Serializer,
    Deserializer,
    Factory,
    RequestGenerator,
    RequestExecutor,
    IndexerBackwardCompatibility,
    RequestBuilderWithParameters,
    RequestBuilderBackwardCompatibility,
    QueryParametersMapper,
}

impl MethodKind {
    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            MethodKind::Constructor | MethodKind::ClientConstructor | MethodKind::RawUrlConstructor
        )
    }

    pub fn is_accessor(self) -> bool {
        matches!(self, MethodKind::Getter | MethodKind::Setter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Custom,
    ParseNode,
    Serializer,
    RequestAdapter,
    PathParameters,
    Path,
    RequestBody,
    RequestConfiguration,
    QueryParametersMapperParameter,
    BackingStore,
    RawUrl,
    SetterValue,
}

/// Transport verb of a request generator/executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}
