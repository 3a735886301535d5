//! Factory bodies: pick the concrete type to instantiate for a parse node

use sdkgen_dom::ParameterKind;

use super::instructions::{Arm, Binding, Guard, Instruction, Operand};
use super::MethodContext;
use crate::discriminator::{PolymorphismStrategy, Resolution, SelectorRole};
use crate::error::Result;

pub(super) fn synthesize(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    ctx.require_parameter(ParameterKind::ParseNode, "parse node parameter")?;
    let resolution = ctx.resolution;

    let mut body = Vec::new();
    if resolution.should_write_parse_node_check {
        body.push(Instruction::ReadDiscriminator {
            property: resolution.discriminator_property.clone().unwrap_or_default(),
        });
    }

    match resolution.strategy {
        PolymorphismStrategy::Inherited => inherited(resolution, &mut body),
        PolymorphismStrategy::UnionComposed => union(resolution, &mut body),
        PolymorphismStrategy::IntersectionComposed => intersection(resolution, &mut body),
        PolymorphismStrategy::None => body.push(construct_self(resolution, Binding::Return)),
    }
    Ok(body)
}

fn construct_self(resolution: &Resolution, bind: Binding) -> Instruction {
    Instruction::Construct {
        type_name: short_name(&resolution.class_name).to_string(),
        target: Some(resolution.class),
        bind,
    }
}

fn short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn inherited(resolution: &Resolution, body: &mut Vec<Instruction>) {
    let arms: Vec<Arm> = resolution
        .mappings
        .iter()
        .map(|mapping| Arm {
            guard: Guard::DiscriminatorEquals {
                key: mapping.key.clone(),
            },
            body: vec![Instruction::Construct {
                type_name: mapping.type_name.clone(),
                target: mapping.target,
                bind: Binding::Return,
            }],
        })
        .collect();

    let fallback = construct_self(resolution, Binding::Return);
    if arms.is_empty() {
        body.push(fallback);
    } else {
        body.push(Instruction::Branch {
            arms,
            otherwise: vec![fallback],
        });
    }
}

fn union(resolution: &Resolution, body: &mut Vec<Instruction>) {
    body.push(construct_self(resolution, Binding::Result));

    // without a discriminator read there is nothing to compare type keys to
    let arms: Vec<Arm> = resolution
        .union_order()
        .into_iter()
        .filter_map(|candidate| match candidate.role {
            SelectorRole::Type if !resolution.should_write_parse_node_check => None,
            SelectorRole::Type => Some(Arm {
                guard: Guard::DiscriminatorEquals {
                    key: resolution.key_for_type(&candidate.shape.type_name),
                },
                body: vec![Instruction::Construct {
                    type_name: candidate.shape.type_name.clone(),
                    target: candidate.shape.target,
                    bind: Binding::Slot(candidate.name.clone()),
                }],
            }),
            SelectorRole::Value => Some(read_and_assign(candidate)),
        })
        .collect();

    if !arms.is_empty() {
        body.push(Instruction::Branch {
            arms,
            otherwise: Vec::new(),
        });
    }
    body.push(Instruction::Return {
        value: Operand::Result,
    });
}

fn intersection(resolution: &Resolution, body: &mut Vec<Instruction>) {
    body.push(construct_self(resolution, Binding::Result));

    let arms: Vec<Arm> = resolution
        .intersection_value_order()
        .into_iter()
        .map(read_and_assign)
        .collect();
    let populate_all: Vec<Instruction> = resolution
        .structural_facets()
        .into_iter()
        .map(|facet| Instruction::Construct {
            type_name: facet.shape.type_name.clone(),
            target: facet.shape.target,
            bind: Binding::Slot(facet.name.clone()),
        })
        .collect();

    if arms.is_empty() {
        body.extend(populate_all);
    } else {
        body.push(Instruction::Branch {
            arms,
            otherwise: populate_all,
        });
    }
    body.push(Instruction::Return {
        value: Operand::Result,
    });
}

fn read_and_assign(candidate: &crate::discriminator::Candidate) -> Arm {
    Arm {
        guard: Guard::ValuePresent {
            shape: candidate.shape.clone(),
        },
        body: vec![Instruction::AssignReadValue {
            property: candidate.name.clone(),
        }],
    }
}
