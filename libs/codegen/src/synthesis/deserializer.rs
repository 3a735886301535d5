//! Deserializer bodies: wire name to field setter maps

use super::instructions::{Arm, Guard, Instruction, Operand};
use super::MethodContext;
use crate::discriminator::{PolymorphismStrategy, Resolution};

pub(super) fn synthesize(ctx: &MethodContext<'_>) -> Vec<Instruction> {
    let resolution = ctx.resolution;
    match resolution.strategy {
        PolymorphismStrategy::UnionComposed => union(resolution),
        PolymorphismStrategy::IntersectionComposed => intersection(resolution),
        PolymorphismStrategy::Inherited | PolymorphismStrategy::None => field_map(resolution),
    }
}

/// Base entries first so the most-derived declaration of a wire name wins
fn field_map(resolution: &Resolution) -> Vec<Instruction> {
    let mut body = Vec::new();
    if resolution.inherits {
        body.push(Instruction::DelegateToBase);
    }
    body.extend(
        resolution
            .candidates
            .iter()
            .filter(|c| !c.exists_in_base_type)
            .map(|c| Instruction::FieldMapEntry {
                wire_name: c.wire_name.clone(),
                property: c.name.clone(),
                shape: c.shape.clone(),
            }),
    );
    body.push(Instruction::Return {
        value: Operand::FieldMap,
    });
    body
}

fn union(resolution: &Resolution) -> Vec<Instruction> {
    let arms: Vec<Arm> = resolution
        .union_order()
        .into_iter()
        .filter(|c| c.role == crate::discriminator::SelectorRole::Type && !c.exists_in_base_type)
        .map(|c| Arm {
            guard: Guard::PropertyPopulated {
                property: c.name.clone(),
            },
            body: vec![Instruction::DelegateToMember {
                property: c.name.clone(),
            }],
        })
        .collect();
    with_empty_fallback(arms)
}

fn intersection(resolution: &Resolution) -> Vec<Instruction> {
    let facets: Vec<String> = resolution
        .structural_facets()
        .into_iter()
        .map(|c| c.name.clone())
        .collect();
    if facets.len() < 2 {
        return vec![empty()];
    }
    with_empty_fallback(vec![Arm {
        guard: Guard::AnyPopulated {
            properties: facets.clone(),
        },
        body: vec![Instruction::MergeFacets { properties: facets }],
    }])
}

fn with_empty_fallback(arms: Vec<Arm>) -> Vec<Instruction> {
    if arms.is_empty() {
        return vec![empty()];
    }
    vec![Instruction::Branch {
        arms,
        otherwise: vec![empty()],
    }]
}

fn empty() -> Instruction {
    Instruction::Return {
        value: Operand::EmptyFieldMap,
    }
}
