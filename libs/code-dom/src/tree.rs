//! Arena-backed element tree
//!
//! Ownership is a strict tree: every element is stored once in the arena and
//! listed in exactly one parent's children. Parent links and type references
//! are plain [`ElementId`]s.

use std::collections::{HashSet, VecDeque};
use std::ops::Index;

use tracing::trace;

use crate::class::{ClassData, InterfaceData};
use crate::element::{Element, ElementData, ElementId, NewElement};
use crate::error::{Error, Result};
use crate::kinds::{ParameterKind, PropertyKind};
use crate::members::{IndexerData, MethodData, ParameterData, PropertyData};
use crate::names::{compare_ignore_case, fold};

#[derive(Debug, Clone)]
pub struct CodeTree {
    elements: Vec<Element>,
    root: ElementId,
}

impl Default for CodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTree {
    /// Create a tree with an unnamed root namespace
    pub fn new() -> Self {
        Self::with_root_namespace("")
    }

    pub fn with_root_namespace(name: impl Into<String>) -> Self {
        let root = ElementId::from_index(0);
        let element = Element::from_new(root, None, NewElement::namespace(name));
        Self {
            elements: vec![element],
            root,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Number of elements ever allocated, detached ones included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Add a child under `parent`.
    ///
    /// Fails with [`Error::DuplicateName`] if a sibling with the same
    /// case-insensitive name exists; the tree is unchanged in that case.
    pub fn add_child(&mut self, parent: ElementId, child: NewElement) -> Result<ElementId> {
        self.check_insertable(parent, &child)?;
        Ok(self.insert_unchecked(parent, child))
    }

    /// Add several children at once. Either all are added or none.
    pub fn add_children(
        &mut self,
        parent: ElementId,
        children: Vec<NewElement>,
    ) -> Result<Vec<ElementId>> {
        let mut batch = HashSet::new();
        for child in &children {
            self.check_insertable(parent, child)?;
            if !batch.insert(fold(&child.name)) {
                return Err(Error::DuplicateName {
                    parent: self.qualified_name(parent),
                    name: child.name.clone(),
                });
            }
        }
        Ok(children
            .into_iter()
            .map(|child| self.insert_unchecked(parent, child))
            .collect())
    }

    fn check_insertable(&self, parent: ElementId, child: &NewElement) -> Result<()> {
        let parent_element = self.get(parent).ok_or_else(|| Error::NotAttached {
            parent: self.describe(parent),
            child: child.name.clone(),
        })?;
        if !parent_element.data.accepts(&child.data) {
            return Err(Error::ElementKindMismatch {
                name: child.name.clone(),
                expected: "member kind allowed under its parent",
            });
        }
        if parent_element.child_index.contains_key(&fold(&child.name)) {
            return Err(Error::DuplicateName {
                parent: self.qualified_name(parent),
                name: child.name.clone(),
            });
        }
        Ok(())
    }

    fn insert_unchecked(&mut self, parent: ElementId, child: NewElement) -> ElementId {
        let id = ElementId::from_index(self.elements.len());
        let key = fold(&child.name);
        trace!(parent = parent.index(), name = %child.name, kind = child.data.kind_name(), "add child");
        self.elements.push(Element::from_new(id, Some(parent), child));
        let parent_element = &mut self.elements[parent.index()];
        parent_element.children.push(id);
        parent_element.child_index.insert(key, id);
        id
    }

    /// Detach `child` from `parent` and clear its parent link.
    ///
    /// The element stays in the arena (ids remain stable) but is no longer
    /// reachable from the root.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if self.get(child).and_then(Element::parent) != Some(parent) {
            return Err(Error::NotAttached {
                parent: self.describe(parent),
                child: self.describe(child),
            });
        }
        let key = fold(self[child].name());
        let parent_element = &mut self.elements[parent.index()];
        parent_element.children.retain(|id| *id != child);
        parent_element.child_index.remove(&key);
        self.elements[child.index()].parent = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Direct child by case-insensitive name
    pub fn find_child(&self, parent: ElementId, name: &str) -> Option<ElementId> {
        self.get(parent)?.child_index.get(&fold(name)).copied()
    }

    /// Find a descendant by name, direct children first, then breadth-first
    /// through deeper levels when `recurse` is set.
    pub fn find_by_name(&self, scope: ElementId, name: &str, recurse: bool) -> Option<ElementId> {
        if !recurse {
            return self.find_child(scope, name);
        }
        let mut queue = VecDeque::from([scope]);
        while let Some(current) = queue.pop_front() {
            if let Some(found) = self.find_child(current, name) {
                return Some(found);
            }
            queue.extend(self[current].children.iter().copied());
        }
        None
    }

    pub fn contains_member(&self, parent: ElementId, name: &str) -> bool {
        self.find_child(parent, name).is_some()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// Parent chain, nearest first
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Reachable from the root through parent links
    pub fn is_attached(&self, id: ElementId) -> bool {
        id == self.root || self.ancestors(id).any(|ancestor| ancestor == self.root)
    }

    /// Nearest enclosing namespace
    pub fn namespace_of(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id).find(|ancestor| self[*ancestor].is_namespace())
    }

    /// Qualified name for error messages; ids from another tree show as `#n`
    fn describe(&self, id: ElementId) -> String {
        match self.get(id) {
            Some(_) => self.qualified_name(id),
            None => format!("#{}", id.index()),
        }
    }

    /// Dotted name from the root, skipping unnamed levels
    pub fn qualified_name(&self, id: ElementId) -> String {
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self[ancestor].name())
            .filter(|name| !name.is_empty())
            .collect();
        segments.reverse();
        let own = self.get(id).map(Element::name).unwrap_or_default();
        if !own.is_empty() {
            segments.push(own);
        }
        segments.join(".")
    }

    /// Every attached element, depth-first in insertion order
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack: Vec<ElementId> = self[scope].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self[current].children.iter().rev().copied());
        }
        result
    }

    /// Every attached class, depth-first in insertion order
    pub fn classes(&self) -> Vec<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self[*id].as_class().is_some())
            .collect()
    }

    // ------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------

    pub fn class(&self, id: ElementId) -> Option<&ClassData> {
        self.get(id)?.as_class()
    }

    pub fn class_mut(&mut self, id: ElementId) -> Option<&mut ClassData> {
        match self.elements.get_mut(id.index())?.data_mut() {
            ElementData::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn interface(&self, id: ElementId) -> Option<&InterfaceData> {
        self.get(id)?.as_interface()
    }

    pub fn interface_mut(&mut self, id: ElementId) -> Option<&mut InterfaceData> {
        match self.elements.get_mut(id.index())?.data_mut() {
            ElementData::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub fn property(&self, id: ElementId) -> Option<&PropertyData> {
        self.get(id)?.as_property()
    }

    pub fn property_mut(&mut self, id: ElementId) -> Option<&mut PropertyData> {
        match self.elements.get_mut(id.index())?.data_mut() {
            ElementData::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn method(&self, id: ElementId) -> Option<&MethodData> {
        self.get(id)?.as_method()
    }

    pub fn method_mut(&mut self, id: ElementId) -> Option<&mut MethodData> {
        match self.elements.get_mut(id.index())?.data_mut() {
            ElementData::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn parameter(&self, id: ElementId) -> Option<&ParameterData> {
        self.get(id)?.as_parameter()
    }

    pub fn indexer(&self, id: ElementId) -> Option<&IndexerData> {
        self.get(id)?.as_indexer()
    }

    pub(crate) fn expect_class(&self, id: ElementId) -> Result<&ClassData> {
        self.class(id).ok_or_else(|| Error::ElementKindMismatch {
            name: self.get(id).map(|e| e.name().to_string()).unwrap_or_default(),
            expected: "class",
        })
    }

    // ------------------------------------------------------------------
    // Member listings
    // ------------------------------------------------------------------

    fn children_where<'a>(
        &'a self,
        parent: ElementId,
        predicate: impl Fn(&Element) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self[parent]
            .children
            .iter()
            .map(move |id| &self[*id])
            .filter(move |element| predicate(element))
    }

    fn sorted_by_name(mut elements: Vec<&Element>) -> Vec<&Element> {
        elements.sort_by(|a, b| compare_ignore_case(a.name(), b.name()));
        elements
    }

    /// Properties in insertion order
    pub fn unordered_properties(&self, class: ElementId) -> Vec<&Element> {
        self.children_where(class, |e| e.as_property().is_some())
            .collect()
    }

    /// Properties by case-insensitive name
    pub fn properties(&self, class: ElementId) -> Vec<&Element> {
        Self::sorted_by_name(self.unordered_properties(class))
    }

    pub fn unordered_methods(&self, class: ElementId) -> Vec<&Element> {
        self.children_where(class, |e| e.as_method().is_some())
            .collect()
    }

    pub fn methods(&self, class: ElementId) -> Vec<&Element> {
        Self::sorted_by_name(self.unordered_methods(class))
    }

    pub fn inner_classes(&self, class: ElementId) -> Vec<&Element> {
        Self::sorted_by_name(
            self.children_where(class, |e| e.as_class().is_some())
                .collect(),
        )
    }

    pub fn unordered_parameters(&self, method: ElementId) -> Vec<&Element> {
        self.children_where(method, |e| e.as_parameter().is_some())
            .collect()
    }

    pub fn parameters(&self, method: ElementId) -> Vec<&Element> {
        Self::sorted_by_name(self.unordered_parameters(method))
    }

    pub fn properties_of_kind(&self, class: ElementId, kinds: &[PropertyKind]) -> Vec<&Element> {
        self.properties(class)
            .into_iter()
            .filter(|e| e.as_property().is_some_and(|p| kinds.contains(&p.kind)))
            .collect()
    }

    pub fn property_of_kind(&self, class: ElementId, kinds: &[PropertyKind]) -> Option<&Element> {
        self.properties_of_kind(class, kinds).into_iter().next()
    }

    pub fn remove_properties_of_kind(
        &mut self,
        class: ElementId,
        kinds: &[PropertyKind],
    ) -> Result<usize> {
        let doomed: Vec<ElementId> = self
            .properties_of_kind(class, kinds)
            .iter()
            .map(|e| e.id())
            .collect();
        for id in &doomed {
            self.remove_child(class, *id)?;
        }
        Ok(doomed.len())
    }

    pub fn parameter_of_kind(&self, method: ElementId, kind: ParameterKind) -> Option<&Element> {
        self.parameters(method)
            .into_iter()
            .find(|e| e.as_parameter().is_some_and(|p| p.kind == kind))
    }

    pub fn parameters_of_kind(&self, method: ElementId, kind: ParameterKind) -> Vec<&Element> {
        self.parameters(method)
            .into_iter()
            .filter(|e| e.as_parameter().is_some_and(|p| p.kind == kind))
            .collect()
    }

    /// The attached indexer of a class, if any
    pub fn indexer_of(&self, class: ElementId) -> Option<&Element> {
        self.children_where(class, |e| e.as_indexer().is_some())
            .next()
    }
}

/// Panics on an id that was not allocated by this tree; use
/// [`CodeTree::get`] for ids of unknown origin.
impl Index<ElementId> for CodeTree {
    type Output = Element;

    fn index(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::ClassKind;
    use crate::types::TypeReference;

    fn model(name: &str) -> NewElement {
        NewElement::class(name, ClassData::new(ClassKind::Model))
    }

    fn custom(name: &str) -> NewElement {
        NewElement::property(
            name,
            PropertyData::new(PropertyKind::Custom, TypeReference::primitive("string"), name),
        )
    }

    #[test]
    fn foreign_parent_is_rejected() {
        let mut other = CodeTree::new();
        let ns = other.add_child(other.root(), NewElement::namespace("models")).unwrap();
        let foreign = other.add_child(ns, model("Pet")).unwrap();

        let mut tree = CodeTree::new();
        let err = tree.add_child(foreign, custom("name")).unwrap_err();
        assert!(matches!(&err, Error::NotAttached { parent, .. } if parent == "#2"));
        let err = tree.add_children(foreign, vec![custom("name")]).unwrap_err();
        assert!(matches!(err, Error::NotAttached { .. }));
        assert!(tree.remove_child(foreign, ns).is_err());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn duplicate_sibling_names_are_rejected() {
        let mut tree = CodeTree::new();
        let class = tree.add_child(tree.root(), model("Pet")).unwrap();
        tree.add_child(class, custom("name")).unwrap();

        let before = tree.len();
        let err = tree.add_child(class, custom("NAME")).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { .. }));
        assert_eq!(tree.len(), before);
        assert_eq!(tree[class].children().len(), 1);
    }

    #[test]
    fn batch_insert_is_all_or_nothing() {
        let mut tree = CodeTree::new();
        let class = tree.add_child(tree.root(), model("Pet")).unwrap();
        let result = tree.add_children(class, vec![custom("a"), custom("b"), custom("A")]);
        assert!(result.is_err());
        assert!(tree[class].children().is_empty());
    }

    #[test]
    fn find_by_name_prefers_shallow_matches() {
        let mut tree = CodeTree::new();
        let models = tree.add_child(tree.root(), NewElement::namespace("models")).unwrap();
        let nested = tree.add_child(models, NewElement::namespace("nested")).unwrap();
        let deep = tree.add_child(nested, model("Item")).unwrap();
        let shallow = tree.add_child(tree.root(), model("item")).unwrap();

        assert_eq!(tree.find_by_name(tree.root(), "ITEM", true), Some(shallow));
        assert_eq!(tree.find_by_name(nested, "item", false), Some(deep));
        assert_eq!(tree.find_by_name(models, "item", false), None);
        assert_eq!(tree.find_by_name(models, "item", true), Some(deep));
    }

    #[test]
    fn remove_child_detaches() {
        let mut tree = CodeTree::new();
        let class = tree.add_child(tree.root(), model("Pet")).unwrap();
        let prop = tree.add_child(class, custom("name")).unwrap();

        tree.remove_child(class, prop).unwrap();
        assert_eq!(tree.parent(prop), None);
        assert!(!tree.is_attached(prop));
        assert!(!tree.contains_member(class, "name"));

        // a detached element cannot be removed again
        assert!(matches!(
            tree.remove_child(class, prop),
            Err(Error::NotAttached { .. })
        ));
    }

    #[test]
    fn properties_are_listed_by_name() {
        let mut tree = CodeTree::new();
        let class = tree.add_child(tree.root(), model("Pet")).unwrap();
        for name in ["zeta", "Alpha", "beta"] {
            tree.add_child(class, custom(name)).unwrap();
        }
        let ordered: Vec<_> = tree.properties(class).iter().map(|e| e.name()).collect();
        assert_eq!(ordered, vec!["Alpha", "beta", "zeta"]);
        let unordered: Vec<_> = tree
            .unordered_properties(class)
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(unordered, vec!["zeta", "Alpha", "beta"]);
    }

    #[test]
    fn members_must_fit_their_parent() {
        let mut tree = CodeTree::new();
        let err = tree.add_child(tree.root(), custom("loose")).unwrap_err();
        assert!(matches!(err, Error::ElementKindMismatch { .. }));
    }

    #[test]
    fn qualified_name_skips_unnamed_root() {
        let mut tree = CodeTree::new();
        let ns = tree.add_child(tree.root(), NewElement::namespace("api")).unwrap();
        let models = tree.add_child(ns, NewElement::namespace("models")).unwrap();
        let class = tree.add_child(models, model("Pet")).unwrap();
        assert_eq!(tree.qualified_name(class), "api.models.Pet");
        assert_eq!(tree.namespace_of(class), Some(models));
    }
}
