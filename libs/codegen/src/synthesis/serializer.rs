//! Serializer bodies: write calls per populated property

use sdkgen_dom::PropertyKind;

use super::instructions::{Arm, Guard, Instruction};
use super::MethodContext;
use crate::discriminator::{Candidate, PolymorphismStrategy, Resolution};

pub(super) fn synthesize(ctx: &MethodContext<'_>) -> Vec<Instruction> {
    let resolution = ctx.resolution;
    let mut body = match resolution.strategy {
        PolymorphismStrategy::UnionComposed => union(resolution),
        PolymorphismStrategy::IntersectionComposed => intersection(resolution),
        PolymorphismStrategy::Inherited | PolymorphismStrategy::None => inherited(resolution),
    };
    if let Some(additional_data) = ctx.property_name(PropertyKind::AdditionalData) {
        body.push(Instruction::WriteAdditionalData {
            property: additional_data,
        });
    }
    body
}

fn inherited(resolution: &Resolution) -> Vec<Instruction> {
    let mut body = Vec::new();
    if resolution.inherits {
        body.push(Instruction::DelegateToBase);
    }
    body.extend(
        resolution
            .candidates
            .iter()
            .filter(|c| !c.exists_in_base_type && !c.read_only)
            .map(|c| Instruction::WriteValue {
                wire_name: Some(c.wire_name.clone()),
                properties: vec![c.name.clone()],
                shape: c.shape.clone(),
            }),
    );
    body
}

/// Unqualified write of a single alternative: the member is the payload
fn write_member(candidate: &Candidate) -> Arm {
    Arm {
        guard: Guard::PropertyPopulated {
            property: candidate.name.clone(),
        },
        body: vec![Instruction::WriteValue {
            wire_name: None,
            properties: vec![candidate.name.clone()],
            shape: candidate.shape.clone(),
        }],
    }
}

fn union(resolution: &Resolution) -> Vec<Instruction> {
    let arms: Vec<Arm> = resolution
        .union_order()
        .into_iter()
        .filter(|c| !c.exists_in_base_type)
        .map(write_member)
        .collect();
    if arms.is_empty() {
        return Vec::new();
    }
    vec![Instruction::Branch {
        arms,
        otherwise: Vec::new(),
    }]
}

fn intersection(resolution: &Resolution) -> Vec<Instruction> {
    let arms: Vec<Arm> = resolution
        .intersection_value_order()
        .into_iter()
        .filter(|c| !c.exists_in_base_type)
        .map(write_member)
        .collect();

    let facets = resolution.structural_facets();
    let write_all: Vec<Instruction> = match facets.first() {
        Some(first) => vec![Instruction::WriteValue {
            wire_name: None,
            properties: facets.iter().map(|c| c.name.clone()).collect(),
            shape: first.shape.clone(),
        }],
        None => Vec::new(),
    };

    if arms.is_empty() {
        return write_all;
    }
    vec![Instruction::Branch {
        arms,
        otherwise: write_all,
    }]
}
