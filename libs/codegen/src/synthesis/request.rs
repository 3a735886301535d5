//! Request-builder side bodies: request information, sending, query-name
//! mapping and child request builders

use sdkgen_dom::{
    ElementData, HttpMethod, MethodKind, ParameterKind, PropertyKind,
    TypeReference, TypeTarget,
};

use super::instructions::{BodyKind, ErrorMappingEntry, Instruction, Operand, PathBinding, SendMode};
use super::{is_void, MethodContext};
use crate::error::{Error, Result};

fn http_method(ctx: &MethodContext<'_>) -> Result<HttpMethod> {
    ctx.tree
        .method(ctx.method)
        .and_then(|m| m.http_method)
        .ok_or_else(|| Error::missing(ctx.method_name(), "http method"))
}

pub(super) fn generator(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let method = http_method(ctx)?;
    let data = ctx
        .tree
        .method(ctx.method)
        .ok_or_else(|| Error::missing(ctx.method_name(), "method"))?;

    let mut body = vec![Instruction::NewRequestInfo];
    if let (Some(url_template), Some(path_parameters)) = (
        ctx.property_name(PropertyKind::UrlTemplate),
        ctx.property_name(PropertyKind::PathParameters),
    ) {
        body.push(Instruction::SetUrlTemplate {
            url_template,
            path_parameters,
        });
    }
    body.push(Instruction::SetHttpMethod { method });
    if !data.accepted_response_types.is_empty() {
        body.push(Instruction::SetAcceptHeader {
            value: data.accepted_response_types.join(", "),
        });
    }

    if let Some(config) = ctx.tree.parameter_of_kind(ctx.method, ParameterKind::RequestConfiguration) {
        let config_class = config
            .as_parameter()
            .and_then(|p| p.type_ref.declared_target());
        let member = |kind: PropertyKind| {
            config_class
                .and_then(|class| ctx.tree.property_of_kind(class, &[kind]))
                .map(|p| p.name().to_string())
        };
        body.push(Instruction::ApplyRequestConfiguration {
            parameter: config.name().to_string(),
            headers: member(PropertyKind::Headers).unwrap_or_else(|| "headers".to_string()),
            query_parameters: member(PropertyKind::QueryParameters),
            options: member(PropertyKind::Options).unwrap_or_else(|| "options".to_string()),
        });
    }

    if let Some(request_body) = ctx.tree.parameter_of_kind(ctx.method, ParameterKind::RequestBody) {
        let kind = request_body
            .as_parameter()
            .map(|p| body_kind(ctx, &p.type_ref))
            .unwrap_or(BodyKind::Scalar);
        body.push(Instruction::SetRequestBody {
            parameter: request_body.name().to_string(),
            kind,
            content_type: data.request_body_content_type.clone(),
            adapter: ctx.property_name(PropertyKind::RequestAdapter),
        });
    }

    body.push(Instruction::Return {
        value: Operand::RequestInfo,
    });
    Ok(body)
}

fn body_kind(ctx: &MethodContext<'_>, type_ref: &TypeReference) -> BodyKind {
    match &type_ref.target {
        TypeTarget::Primitive(name) if name.eq_ignore_ascii_case("binary") => BodyKind::Stream,
        TypeTarget::Declared(_) if is_class(ctx, type_ref) => BodyKind::Parsable,
        TypeTarget::Composed(_) => BodyKind::Parsable,
        _ => BodyKind::Scalar,
    }
}

fn is_class(ctx: &MethodContext<'_>, type_ref: &TypeReference) -> bool {
    type_ref
        .declared_target()
        .and_then(|id| ctx.tree.get(id))
        .is_some_and(|e| matches!(e.data(), ElementData::Class(_) | ElementData::Interface(_)))
}

pub(super) fn executor(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let verb = http_method(ctx)?;
    let data = ctx
        .tree
        .method(ctx.method)
        .ok_or_else(|| Error::missing(ctx.method_name(), "method"))?;

    let generator = ctx
        .tree
        .methods(ctx.class)
        .into_iter()
        .find(|m| {
            m.as_method().is_some_and(|d| {
                d.kind == MethodKind::RequestGenerator && d.http_method == Some(verb)
            })
        })
        .ok_or_else(|| Error::missing(ctx.method_name(), "request generator"))?;

    let arguments = [ParameterKind::RequestBody, ParameterKind::RequestConfiguration]
        .into_iter()
        .filter_map(|kind| ctx.parameter_name(kind))
        .collect();
    let mut body = vec![Instruction::InvokeGenerator {
        method: generator.name().to_string(),
        arguments,
    }];

    if !data.error_mappings.is_empty() {
        let mut entries: Vec<ErrorMappingEntry> = data
            .error_mappings
            .iter()
            .map(|(code, type_ref)| ErrorMappingEntry {
                code: code.to_uppercase(),
                type_name: type_ref.name().to_string(),
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        body.push(Instruction::ErrorMapping { entries });
    }

    let (mode, type_name) = match data.return_type.as_ref() {
        None => (SendMode::NoContent, None),
        Some(return_type) if is_void(return_type) => (SendMode::NoContent, None),
        Some(return_type) => (
            send_mode(ctx, return_type),
            Some(return_type.name().to_string()),
        ),
    };
    body.push(Instruction::Send { mode, type_name });
    Ok(body)
}

/// Enums and primitives travel as scalars; streams are primitives too
fn send_mode(ctx: &MethodContext<'_>, return_type: &TypeReference) -> SendMode {
    let scalar = return_type.is_primitive()
        || return_type
            .declared_target()
            .and_then(|id| ctx.tree.get(id))
            .is_some_and(|e| e.as_enum().is_some());
    match (return_type.is_collection(), scalar) {
        (true, true) => SendMode::CollectionOfPrimitive,
        (true, false) => SendMode::Collection,
        (false, true) => SendMode::Primitive,
        (false, false) => SendMode::Object,
    }
}

pub(super) fn query_parameters_mapper(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let parameter = ctx.require_parameter(
        ParameterKind::QueryParametersMapperParameter,
        "query parameters mapper parameter",
    )?;
    let properties = ctx
        .tree
        .properties_of_kind(ctx.class, &[PropertyKind::QueryParameter]);
    let (escaped, plain): (Vec<_>, Vec<_>) = properties
        .into_iter()
        .filter_map(|p| p.as_property().map(|data| (p.name(), data)))
        .partition(|(_, data)| data.is_name_escaped);

    let mut body: Vec<Instruction> = escaped
        .into_iter()
        .map(|(name, data)| Instruction::MapQueryParameter {
            from: name.to_string(),
            to: data.wire_name.clone(),
        })
        .collect();
    body.extend(plain.into_iter().map(|(name, _)| Instruction::MapQueryParameter {
        from: name.to_string(),
        to: name.to_string(),
    }));
    body.push(Instruction::Return {
        value: Operand::Parameter(parameter),
    });
    Ok(body)
}

/// Child builder for `builder[key]` after lowering
pub(super) fn indexer_accessor(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let data = ctx
        .tree
        .method(ctx.method)
        .ok_or_else(|| Error::missing(ctx.method_name(), "method"))?;
    let origin = data
        .indexer_origin
        .as_ref()
        .ok_or_else(|| Error::missing(ctx.method_name(), "indexer"))?;
    let parameter = ctx
        .parameter_name(ParameterKind::Path)
        .unwrap_or_else(|| origin.indexer.key_name.clone());

    Ok(vec![build_request_builder(
        ctx,
        &origin.indexer.return_type,
        vec![PathBinding {
            parameter,
            serialization_name: origin.indexer.serialization_name.clone(),
        }],
    )])
}

pub(super) fn with_parameters(ctx: &MethodContext<'_>) -> Vec<Instruction> {
    let segments = ctx
        .tree
        .parameters_of_kind(ctx.method, ParameterKind::Path)
        .into_iter()
        .map(|p| PathBinding {
            parameter: p.name().to_string(),
            serialization_name: p
                .as_parameter()
                .and_then(|d| d.serialization_name.clone())
                .unwrap_or_else(|| p.name().to_string()),
        })
        .collect();
    let return_type = ctx
        .tree
        .method(ctx.method)
        .and_then(|m| m.return_type.clone())
        .unwrap_or_else(|| TypeReference::external(ctx.tree[ctx.method].name()));
    vec![build_request_builder(ctx, &return_type, segments)]
}

fn build_request_builder(
    ctx: &MethodContext<'_>,
    return_type: &TypeReference,
    segments: Vec<PathBinding>,
) -> Instruction {
    Instruction::BuildRequestBuilder {
        type_name: return_type.name().to_string(),
        path_parameters: ctx.property_name(PropertyKind::PathParameters),
        adapter: ctx.property_name(PropertyKind::RequestAdapter),
        segments,
    }
}
