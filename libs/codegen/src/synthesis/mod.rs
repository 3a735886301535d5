//! Method-body synthesis
//!
//! For every method of every class, produce its logical body as a list of
//! [`Instruction`]s. Element-scoped failures are recorded and processing moves
//! on to the next element; structural failures abort the pass.

mod accessors;
mod constructor;
mod deserializer;
mod factory;
pub mod instructions;
mod request;
mod serializer;

use serde::Serialize;
use tracing::{info, warn};

use sdkgen_dom::{CodeTree, ElementId, MethodKind, ParameterKind};

use crate::discriminator::{self, Resolution};
use crate::error::{Error, Result};
use crate::generators::GeneratorConfig;

pub use instructions::{
    flatten, Arm, Binding, BodyKind, ErrorMappingEntry, Guard, Instruction, Operand, PathBinding,
    PropertyAccess, SendMode, ValueAccess, ValueShape,
};

/// Synthesized body of one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodProgram {
    pub method: ElementId,
    pub name: String,
    pub kind: MethodKind,
    pub body: Vec<Instruction>,
}

/// A method that could not be synthesized
#[derive(Debug)]
pub struct SynthesisFailure {
    pub element: String,
    pub error: Error,
}

#[derive(Debug)]
pub struct ClassSynthesis {
    pub class: ElementId,
    pub resolution: Resolution,
    /// In method name order
    pub programs: Vec<MethodProgram>,
    pub failures: Vec<SynthesisFailure>,
}

impl ClassSynthesis {
    pub fn program(&self, kind: MethodKind) -> Option<&MethodProgram> {
        self.programs.iter().find(|p| p.kind == kind)
    }

    pub fn program_named(&self, name: &str) -> Option<&MethodProgram> {
        self.programs
            .iter()
            .find(|p| sdkgen_dom::names::eq_ignore_case(&p.name, name))
    }
}

#[derive(Debug, Default)]
pub struct TreeSynthesis {
    pub classes: Vec<ClassSynthesis>,
}

impl TreeSynthesis {
    pub fn class(&self, class: ElementId) -> Option<&ClassSynthesis> {
        self.classes.iter().find(|c| c.class == class)
    }

    pub fn program(&self, class: ElementId, kind: MethodKind) -> Option<&MethodProgram> {
        self.class(class)?.program(kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SynthesisFailure> {
        self.classes.iter().flat_map(|c| c.failures.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Read-only inputs shared by every per-method synthesizer
pub(crate) struct MethodContext<'a> {
    pub tree: &'a CodeTree,
    pub config: &'a GeneratorConfig,
    pub resolution: &'a Resolution,
    pub class: ElementId,
    pub method: ElementId,
}

impl MethodContext<'_> {
    pub fn method_name(&self) -> String {
        self.tree.qualified_name(self.method)
    }

    pub fn parameter_name(&self, kind: ParameterKind) -> Option<String> {
        self.tree
            .parameter_of_kind(self.method, kind)
            .map(|p| p.name().to_string())
    }

    pub fn require_parameter(&self, kind: ParameterKind, argument: &str) -> Result<String> {
        self.parameter_name(kind)
            .ok_or_else(|| Error::missing(self.method_name(), argument))
    }

    pub fn property_name(&self, kind: sdkgen_dom::PropertyKind) -> Option<String> {
        self.tree
            .property_of_kind(self.class, &[kind])
            .map(|p| p.name().to_string())
    }

    fn unsupported(&self, construct: &str) -> Error {
        Error::UnsupportedConstruct {
            construct: construct.to_string(),
            backend: self.config.backend.name.clone(),
        }
    }
}

/// Synthesize every class of a validated tree
pub fn synthesize_tree(tree: &CodeTree, config: &GeneratorConfig) -> Result<TreeSynthesis> {
    tree.validate()?;
    let classes = tree
        .classes()
        .into_iter()
        .map(|class| synthesize_class(tree, config, class))
        .collect::<Result<Vec<_>>>()?;
    let synthesis = TreeSynthesis { classes };
    info!(
        classes = synthesis.classes.len(),
        failures = synthesis.failure_count(),
        backend = %config.backend.name,
        "synthesized tree"
    );
    Ok(synthesis)
}

/// Synthesize every method of one class
pub fn synthesize_class(
    tree: &CodeTree,
    config: &GeneratorConfig,
    class: ElementId,
) -> Result<ClassSynthesis> {
    let resolution = discriminator::resolve(tree, class)?;
    let mut programs = Vec::new();
    let mut failures = Vec::new();

    for method in tree.methods(class) {
        match synthesize_method(tree, config, &resolution, method.id()) {
            Ok(program) => programs.push(program),
            Err(error) if error.is_fatal_for_pass() => return Err(error),
            Err(error) => {
                let element = tree.qualified_name(method.id());
                warn!(element = %element, error = %error, "method synthesis failed");
                failures.push(SynthesisFailure { element, error });
            }
        }
    }

    Ok(ClassSynthesis {
        class,
        resolution,
        programs,
        failures,
    })
}

/// Synthesize the body of a single method of the resolved class
pub fn synthesize_method(
    tree: &CodeTree,
    config: &GeneratorConfig,
    resolution: &Resolution,
    method: ElementId,
) -> Result<MethodProgram> {
    let data = tree.method(method).ok_or_else(|| {
        Error::Structural(sdkgen_dom::Error::ElementKindMismatch {
            name: tree.qualified_name(method),
            expected: "method",
        })
    })?;
    let ctx = MethodContext {
        tree,
        config,
        resolution,
        class: resolution.class,
        method,
    };

    let body = match data.kind {
        MethodKind::Factory => factory::synthesize(&ctx)?,
        MethodKind::Deserializer => deserializer::synthesize(&ctx),
        MethodKind::Serializer => serializer::synthesize(&ctx),
        MethodKind::Constructor => constructor::synthesize(&ctx)?,
        MethodKind::ClientConstructor => constructor::synthesize_client(&ctx)?,
        MethodKind::RawUrlConstructor => {
            if !config.backend.supports_raw_url_constructor {
                return Err(ctx.unsupported("RawUrlConstructor"));
            }
            constructor::synthesize_raw_url(&ctx)?
        }
        MethodKind::Getter => accessors::getter(&ctx)?,
        MethodKind::Setter => accessors::setter(&ctx)?,
        MethodKind::RequestGenerator => request::generator(&ctx)?,
        MethodKind::RequestExecutor => request::executor(&ctx)?,
        MethodKind::QueryParametersMapper => request::query_parameters_mapper(&ctx)?,
        MethodKind::IndexerBackwardCompatibility => request::indexer_accessor(&ctx)?,
        MethodKind::RequestBuilderWithParameters => request::with_parameters(&ctx),
        MethodKind::RequestBuilderBackwardCompatibility => {
            if !config.backend.supports_request_builder_backward_compatibility {
                return Err(ctx.unsupported("RequestBuilderBackwardCompatibility"));
            }
            request::with_parameters(&ctx)
        }
        MethodKind::Custom => default_body(&ctx),
    };

    Ok(MethodProgram {
        method,
        name: tree[method].name().to_string(),
        kind: data.kind,
        body,
    })
}

/// Methods without a synthesized meaning return a fresh value of their type
fn default_body(ctx: &MethodContext<'_>) -> Vec<Instruction> {
    match ctx.tree.method(ctx.method).and_then(|m| m.return_type.as_ref()) {
        Some(return_type) if !is_void(return_type) => vec![Instruction::Construct {
            type_name: return_type.name().to_string(),
            target: return_type.declared_target(),
            bind: Binding::Return,
        }],
        _ => Vec::new(),
    }
}

pub(crate) fn is_void(type_ref: &sdkgen_dom::TypeReference) -> bool {
    type_ref.is_primitive() && sdkgen_dom::names::eq_ignore_case(type_ref.name(), "void")
}
