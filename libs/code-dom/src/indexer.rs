//! Indexer assignment and lowering
//!
//! A class holds at most one indexer. Backends without keyed-access syntax get
//! a method pair instead: `by{Key}` and the `with{Key}` accessor kept for
//! backward compatibility. Both carry an [`IndexerOrigin`] so the family can
//! be found and replaced as a unit.

use tracing::debug;

use crate::element::{ElementId, NewElement};
use crate::error::{Error, Result};
use crate::kinds::{MethodKind, ParameterKind};
use crate::members::{IndexerData, IndexerOrigin, IndexerRole, MethodData, ParameterData};
use crate::names::capitalize_first;
use crate::tree::CodeTree;

/// Name under which an attached indexer is stored among class members
pub fn indexer_element_name(indexer: &IndexerData) -> String {
    format!("[{}]", indexer.key_name)
}

pub fn lowered_method_name(indexer: &IndexerData, role: IndexerRole) -> String {
    let key = capitalize_first(&indexer.key_name);
    match role {
        IndexerRole::ByKey => format!("by{key}"),
        IndexerRole::WithKey => format!("with{key}"),
    }
}

impl CodeTree {
    /// Methods produced by lowering an indexer of `class`
    pub fn indexer_family(&self, class: ElementId) -> Vec<ElementId> {
        self.unordered_methods(class)
            .into_iter()
            .filter(|e| e.as_method().is_some_and(|m| m.indexer_origin.is_some()))
            .map(|e| e.id())
            .collect()
    }

    /// The indexer in effect for `class`: the attached one, or the one its
    /// lowered family was generated from.
    pub fn effective_indexer(&self, class: ElementId) -> Option<&IndexerData> {
        if let Some(attached) = self.indexer_of(class).and_then(|e| e.as_indexer()) {
            return Some(attached);
        }
        self.indexer_family(class)
            .into_iter()
            .find_map(|id| self.method(id)?.indexer_origin.as_ref())
            .map(|origin| &origin.indexer)
    }

    /// Set the indexer of `class`.
    ///
    /// The first assignment attaches the indexer as is. Once an indexer or a
    /// lowered family is present, reassignment detaches the previous indexer,
    /// drops the previous family and lowers the new indexer in its place, so
    /// at most one family ever exists.
    pub fn assign_indexer(&mut self, class: ElementId, indexer: IndexerData) -> Result<()> {
        self.expect_class(class)?;
        let previous_indexer = self.indexer_of(class).map(|e| e.id());
        let previous_family = self.indexer_family(class);

        if previous_indexer.is_none() && previous_family.is_empty() {
            self.add_child(class, NewElement::indexer(indexer_element_name(&indexer), indexer))?;
            return Ok(());
        }

        let replaced: Vec<ElementId> = previous_indexer.into_iter().chain(previous_family).collect();
        self.replace_with_family(class, &replaced, indexer)
    }

    /// Replace the attached indexer with its method family. Calling it again,
    /// or on a class without an indexer, changes nothing.
    pub fn lower_indexer(&mut self, class: ElementId) -> Result<bool> {
        self.expect_class(class)?;
        let Some(attached) = self.indexer_of(class) else {
            return Ok(false);
        };
        let attached_id = attached.id();
        let indexer = attached.as_indexer().cloned().ok_or_else(|| Error::ElementKindMismatch {
            name: attached.name().to_string(),
            expected: "indexer",
        })?;
        let mut replaced = vec![attached_id];
        replaced.extend(self.indexer_family(class));
        self.replace_with_family(class, &replaced, indexer)?;
        Ok(true)
    }

    fn replace_with_family(
        &mut self,
        class: ElementId,
        replaced: &[ElementId],
        indexer: IndexerData,
    ) -> Result<()> {
        let roles = [IndexerRole::ByKey, IndexerRole::WithKey];

        // collisions with members that survive the replacement leave the class untouched
        for role in roles {
            let name = lowered_method_name(&indexer, role);
            if let Some(existing) = self.find_child(class, &name) {
                if !replaced.contains(&existing) {
                    return Err(Error::DuplicateName {
                        parent: self.qualified_name(class),
                        name,
                    });
                }
            }
        }

        for id in replaced {
            self.remove_child(class, *id)?;
        }

        for role in roles {
            let name = lowered_method_name(&indexer, role);
            let method = MethodData {
                indexer_origin: Some(IndexerOrigin {
                    indexer: indexer.clone(),
                    role,
                }),
                ..MethodData::new(MethodKind::IndexerBackwardCompatibility)
                    .returning(indexer.return_type.clone())
            };
            let method_id = self.add_child(class, NewElement::method(name, method))?;
            let key = ParameterData::new(ParameterKind::Path, indexer.key_type.clone())
                .with_serialization_name(indexer.serialization_name.clone());
            self.add_child(method_id, NewElement::parameter(indexer.key_name.clone(), key))?;
        }

        debug!(
            class = %self.qualified_name(class),
            key = %indexer.key_name,
            "lowered indexer"
        );
        Ok(())
    }
}
