//! Constructor bodies and property-initialization order

use sdkgen_dom::names::compare_ignore_case;
use sdkgen_dom::{ClassKind, Element, MethodKind, ParameterKind, PropertyKind};

use super::instructions::{Instruction, Operand, PathBinding, PropertyAccess};
use super::MethodContext;
use crate::error::{Error, Result};

/// Property kinds initialized without going through a setter
pub fn direct_access_kinds(uses_backing_store: bool) -> Vec<PropertyKind> {
    let mut kinds = vec![
        PropertyKind::BackingStore,
        PropertyKind::RequestBuilder,
        PropertyKind::UrlTemplate,
        PropertyKind::PathParameters,
    ];
    if !uses_backing_store {
        kinds.push(PropertyKind::AdditionalData);
    }
    kinds
}

/// Property kinds initialized through their setter
pub fn setter_access_kinds(uses_backing_store: bool) -> Vec<PropertyKind> {
    let direct = direct_access_kinds(uses_backing_store);
    [PropertyKind::AdditionalData, PropertyKind::Custom]
        .into_iter()
        .filter(|kind| !direct.contains(kind))
        .collect()
}

pub(super) fn synthesize(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let class = ctx.tree.class(ctx.class).ok_or_else(|| {
        Error::Structural(sdkgen_dom::Error::ElementKindMismatch {
            name: ctx.resolution.class_name.clone(),
            expected: "class",
        })
    })?;
    let kind = ctx
        .tree
        .method(ctx.method)
        .map(|m| m.kind)
        .unwrap_or(MethodKind::Constructor);

    let mut body = Vec::new();
    if class.inherits() {
        body.push(base_call(ctx, class.kind));
    }

    let request_builder_constructor = class.kind == ClassKind::RequestBuilder
        && matches!(kind, MethodKind::Constructor | MethodKind::ClientConstructor);
    if !request_builder_constructor {
        body.extend(initialize_properties(ctx));
        if let Some(path_parameters) = ctx.parameter_name(ParameterKind::PathParameters) {
            let segments = path_segments(ctx);
            body.push(Instruction::MergePathParameters {
                parameter: path_parameters.clone(),
                segments,
            });
            if let Some(property) = ctx.property_name(PropertyKind::PathParameters) {
                body.push(Instruction::AssignFromParameter {
                    property,
                    parameter: path_parameters,
                });
            }
        }
    }
    Ok(body)
}

/// Arguments forwarded to the base constructor
fn base_call(ctx: &MethodContext<'_>, kind: ClassKind) -> Instruction {
    let adapter = ctx.parameter_name(ParameterKind::RequestAdapter);
    let url_template = ctx
        .tree
        .property_of_kind(ctx.class, &[PropertyKind::UrlTemplate])
        .and_then(|p| p.as_property());

    let arguments = match (kind, adapter, url_template) {
        (ClassKind::RequestBuilder, Some(adapter), Some(url_template)) => vec![
            Operand::Parameter(adapter),
            Operand::Literal(url_template.default_value.clone().unwrap_or_default()),
            ctx.parameter_name(ParameterKind::PathParameters)
                .map(Operand::Parameter)
                .unwrap_or_else(|| Operand::Literal(String::new())),
        ],
        _ => Vec::new(),
    };
    Instruction::CallBaseConstructor { arguments }
}

fn path_segments(ctx: &MethodContext<'_>) -> Vec<PathBinding> {
    ctx.tree
        .parameters_of_kind(ctx.method, ParameterKind::Path)
        .into_iter()
        .map(|p| PathBinding {
            parameter: p.name().to_string(),
            serialization_name: p
                .as_parameter()
                .and_then(|d| d.serialization_name.clone())
                .unwrap_or_else(|| p.name().to_string()),
        })
        .collect()
}

/// Direct-access group before the setter group; inside each, properties with
/// a default come first, then name order.
pub(super) fn initialize_properties(ctx: &MethodContext<'_>) -> Vec<Instruction> {
    let uses_backing_store = ctx.config.uses_backing_store;
    let mut body = Vec::new();

    let direct = ctx
        .tree
        .properties_of_kind(ctx.class, &direct_access_kinds(uses_backing_store));
    body.extend(ordered(direct, |_| true).into_iter().map(|(property, default)| {
        Instruction::InitializeProperty {
            property,
            access: PropertyAccess::Direct,
            default,
        }
    }));

    let setter = ctx
        .tree
        .properties_of_kind(ctx.class, &setter_access_kinds(uses_backing_store));
    // composed-typed defaults are ambiguous about which member to build
    let keeps_default = |element: &Element| {
        element
            .as_property()
            .and_then(|p| p.type_ref.declared_target())
            .and_then(|target| ctx.tree.class(target))
            .map_or(true, |class| class.original_composed_type.is_none())
    };
    body.extend(ordered(setter, keeps_default).into_iter().map(|(property, default)| {
        Instruction::InitializeProperty {
            property,
            access: PropertyAccess::Setter,
            default,
        }
    }));
    body
}

fn ordered(
    properties: Vec<&Element>,
    keeps_default: impl Fn(&Element) -> bool,
) -> Vec<(String, Option<String>)> {
    let mut entries: Vec<(String, Option<String>)> = properties
        .into_iter()
        .filter_map(|element| {
            let data = element.as_property()?;
            let default = (data.has_default() && keeps_default(element))
                .then(|| data.default_value.clone())
                .flatten();
            Some((element.name().to_string(), default))
        })
        .collect();
    entries.sort_by(|(a_name, a_default), (b_name, b_default)| {
        b_default
            .is_some()
            .cmp(&a_default.is_some())
            .then_with(|| compare_ignore_case(a_name, b_name))
    });
    entries
}

pub(super) fn synthesize_client(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let mut body = synthesize(ctx)?;
    let Some(adapter) = ctx.property_name(PropertyKind::RequestAdapter) else {
        return Ok(body);
    };
    let method = ctx
        .tree
        .method(ctx.method)
        .ok_or_else(|| Error::missing(ctx.method_name(), "method"))?;

    body.extend(
        method
            .serializer_modules
            .iter()
            .map(|module| Instruction::RegisterDefaultSerializer {
                module: module.clone(),
            }),
    );
    body.extend(
        method
            .deserializer_modules
            .iter()
            .map(|module| Instruction::RegisterDefaultDeserializer {
                module: module.clone(),
            }),
    );
    if let Some(url) = method.base_url.as_ref().filter(|url| !url.is_empty()) {
        body.push(Instruction::SetBaseUrl {
            adapter: adapter.clone(),
            url: url.clone(),
            path_parameters: ctx.property_name(PropertyKind::PathParameters),
        });
    }
    if let Some(parameter) = ctx.parameter_name(ParameterKind::BackingStore) {
        body.push(Instruction::EnableBackingStore { adapter, parameter });
    }
    Ok(body)
}

pub(super) fn synthesize_raw_url(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let raw_url = ctx.require_parameter(ParameterKind::RawUrl, "raw url parameter")?;
    let property = ctx
        .property_name(PropertyKind::PathParameters)
        .ok_or_else(|| Error::missing(ctx.method_name(), "path parameters property"))?;
    let mut body = Vec::new();
    if let Some(adapter) = ctx.parameter_name(ParameterKind::RequestAdapter) {
        let url_template = ctx
            .tree
            .property_of_kind(ctx.class, &[PropertyKind::UrlTemplate])
            .and_then(|p| p.as_property())
            .and_then(|p| p.default_value.clone())
            .unwrap_or_default();
        body.push(Instruction::CallBaseConstructor {
            arguments: vec![
                Operand::Parameter(adapter),
                Operand::Literal(url_template),
                Operand::Parameter(raw_url.clone()),
            ],
        });
    }
    body.push(Instruction::BindRawUrl {
        parameter: raw_url,
        property,
    });
    Ok(body)
}
