//! Structural validation
//!
//! Run once after the front end finished building a tree. Everything later
//! passes rely on (live reference targets, finite base chains, well-formed
//! composed types) is checked here so they can assume it.

use std::collections::HashSet;

use tracing::debug;

use crate::element::{ElementData, ElementId};
use crate::error::{Error, Result};
use crate::tree::CodeTree;
use crate::types::{TypeReference, TypeTarget};

impl CodeTree {
    /// Report the first structural violation found, if any
    pub fn validate(&self) -> Result<()> {
        let attached = self.descendants(self.root());
        for id in &attached {
            for type_ref in self.references_of(*id) {
                self.check_reference(*id, type_ref)?;
            }
            if let Some(class) = self.class(*id) {
                if let Some(base) = class.base_type.as_ref().and_then(TypeReference::declared_target) {
                    self.class(base).ok_or_else(|| Error::ElementKindMismatch {
                        name: self[base].name().to_string(),
                        expected: "class usable as a base type",
                    })?;
                }
                self.check_base_chain(*id)?;
            }
        }
        debug!(elements = attached.len(), "tree validated");
        Ok(())
    }

    /// Every type reference held directly by an element
    fn references_of(&self, id: ElementId) -> Vec<&TypeReference> {
        let mut refs = Vec::new();
        match self[id].data() {
            ElementData::Namespace | ElementData::Enum(_) => {}
            ElementData::Class(class) => {
                refs.extend(class.base_type.iter());
                refs.extend(class.implements.iter());
                refs.extend(class.discriminator.mappings().map(|m| &m.target));
                if let Some(composed) = &class.original_composed_type {
                    refs.extend(composed.members());
                }
            }
            ElementData::Interface(interface) => refs.extend(interface.implements.iter()),
            ElementData::Property(property) => refs.push(&property.type_ref),
            ElementData::Method(method) => {
                refs.extend(method.return_type.iter());
                refs.extend(method.error_mappings.values());
                if let Some(origin) = &method.indexer_origin {
                    refs.push(&origin.indexer.key_type);
                    refs.push(&origin.indexer.return_type);
                }
            }
            ElementData::Parameter(parameter) => refs.push(&parameter.type_ref),
            ElementData::Indexer(indexer) => {
                refs.push(&indexer.key_type);
                refs.push(&indexer.return_type);
            }
        }
        refs
    }

    fn check_reference(&self, from: ElementId, type_ref: &TypeReference) -> Result<()> {
        match &type_ref.target {
            TypeTarget::Primitive(_) => Ok(()),
            TypeTarget::Declared(declared) => {
                let Some(target) = declared.target else {
                    return Ok(());
                };
                let live = self
                    .get(target)
                    .is_some_and(|e| e.data().is_type_definition() && self.is_attached(target));
                if live {
                    Ok(())
                } else {
                    Err(Error::DanglingReference {
                        from: self.qualified_name(from),
                        target: declared.name.clone(),
                    })
                }
            }
            TypeTarget::Composed(composed) => {
                if composed.members().len() < 2 {
                    return Err(Error::InvalidComposedType(format!(
                        "`{}` on `{}` has fewer than 2 members",
                        composed.name(),
                        self.qualified_name(from)
                    )));
                }
                composed
                    .members()
                    .iter()
                    .try_for_each(|member| self.check_reference(from, member))
            }
        }
    }

    fn check_base_chain(&self, class: ElementId) -> Result<()> {
        let mut seen = HashSet::from([class]);
        let mut current = class;
        while let Some(parent) = self
            .class(current)
            .and_then(|c| c.base_type.as_ref())
            .and_then(TypeReference::declared_target)
            .filter(|target| self.class(*target).is_some())
        {
            if !seen.insert(parent) {
                return Err(Error::CyclicBaseChain {
                    class: self.qualified_name(class),
                });
            }
            current = parent;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::class::ClassData;
    use crate::element::NewElement;
    use crate::error::Error;
    use crate::kinds::{ClassKind, PropertyKind};
    use crate::members::PropertyData;
    use crate::tree::CodeTree;
    use crate::types::TypeReference;

    #[test]
    fn detached_target_is_dangling() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let pet = tree
            .add_child(root, NewElement::class("Pet", ClassData::new(ClassKind::Model)))
            .unwrap();
        let owner = tree
            .add_child(root, NewElement::class("Owner", ClassData::new(ClassKind::Model)))
            .unwrap();
        tree.add_child(
            owner,
            NewElement::property(
                "pet",
                PropertyData::new(PropertyKind::Custom, TypeReference::declared("Pet", pet), "pet"),
            ),
        )
        .unwrap();
        assert_eq!(tree.validate(), Ok(()));

        tree.remove_child(root, pet).unwrap();
        assert!(matches!(
            tree.validate(),
            Err(Error::DanglingReference { ref target, .. }) if target == "Pet"
        ));
    }

    #[test]
    fn cyclic_base_chain_is_reported() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let a = tree
            .add_child(root, NewElement::class("A", ClassData::new(ClassKind::Model)))
            .unwrap();
        let b = tree
            .add_child(
                root,
                NewElement::class(
                    "B",
                    ClassData::new(ClassKind::Model).with_base(TypeReference::declared("A", a)),
                ),
            )
            .unwrap();
        tree.class_mut(a).unwrap().base_type = Some(TypeReference::declared("B", b));

        assert!(matches!(tree.validate(), Err(Error::CyclicBaseChain { .. })));
    }
}
