//! Getter and setter bodies

use sdkgen_dom::{ParameterKind, PropertyData, PropertyKind};

use super::instructions::Instruction;
use super::MethodContext;
use crate::error::{Error, Result};

fn accessed_property<'a>(ctx: &MethodContext<'a>) -> Result<(String, &'a PropertyData)> {
    let name = ctx
        .tree
        .method(ctx.method)
        .and_then(|m| m.accessed_property.clone())
        .ok_or_else(|| Error::missing(ctx.method_name(), "accessed property"))?;
    let property = ctx
        .tree
        .find_child(ctx.class, &name)
        .and_then(|id| ctx.tree.property(id))
        .ok_or_else(|| Error::missing(ctx.method_name(), "accessed property"))?;
    Ok((name, property))
}

pub(super) fn getter(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let (name, property) = accessed_property(ctx)?;
    let read = match ctx.property_name(PropertyKind::BackingStore) {
        Some(store) => {
            let materialize = !property.type_ref.is_nullable && !property.read_only;
            Instruction::ReadBackingStore {
                store,
                key: name,
                lazy_default: property.default_value.clone().filter(|_| materialize),
            }
        }
        None => Instruction::ReadField { property: name },
    };
    Ok(vec![read])
}

pub(super) fn setter(ctx: &MethodContext<'_>) -> Result<Vec<Instruction>> {
    let (name, _) = accessed_property(ctx)?;
    let parameter = ctx
        .parameter_name(ParameterKind::SetterValue)
        .unwrap_or_else(|| "value".to_string());
    let write = match ctx.property_name(PropertyKind::BackingStore) {
        Some(store) => Instruction::WriteBackingStore {
            store,
            key: name,
            parameter,
        },
        None => Instruction::WriteField {
            property: name,
            parameter,
        },
    };
    Ok(vec![write])
}
