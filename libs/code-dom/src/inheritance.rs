//! Base-chain queries
//!
//! Single inheritance only. Base links are arena ids, so every walk is bounded
//! by the arena size; a cycle is a construction bug reported by
//! [`CodeTree::validate`](crate::CodeTree::validate).

use crate::element::ElementId;
use crate::tree::CodeTree;

impl CodeTree {
    /// Target class of the base type, `None` when absent or external
    pub fn base_class(&self, class: ElementId) -> Option<ElementId> {
        let target = self.class(class)?.base_type.as_ref()?.declared_target()?;
        self.class(target).map(|_| target)
    }

    /// Proper ancestors, nearest first
    pub fn base_chain(&self, class: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = self.base_class(class);
        while let Some(parent) = current {
            if parent == class || chain.contains(&parent) {
                debug_assert!(false, "cyclic base chain at {}", self.qualified_name(class));
                break;
            }
            chain.push(parent);
            current = self.base_class(parent);
        }
        chain
    }

    /// `ancestor` appears in the proper base chain of `class`
    pub fn derives_from(&self, class: ElementId, ancestor: ElementId) -> bool {
        self.base_chain(class).contains(&ancestor)
    }

    /// Base chain ordered root first.
    ///
    /// With `same_namespace_only` the walk stops at the first base declared in
    /// a different namespace than its subclass. `include_self` appends `class`
    /// itself as the last entry.
    pub fn inheritance_tree(
        &self,
        class: ElementId,
        same_namespace_only: bool,
        include_self: bool,
    ) -> Vec<ElementId> {
        let mut tree = Vec::new();
        let mut current = class;
        for parent in self.base_chain(class) {
            if same_namespace_only && self.namespace_of(parent) != self.namespace_of(current) {
                break;
            }
            tree.push(parent);
            current = parent;
        }
        tree.reverse();
        if include_self {
            tree.push(class);
        }
        tree
    }

    /// Root of the base chain.
    ///
    /// Returns `None` when that root is `stop_at`, so a class without a base
    /// does not report itself when asked to skip itself.
    pub fn greatest_grandparent(
        &self,
        class: ElementId,
        stop_at: Option<ElementId>,
    ) -> Option<ElementId> {
        let root = self.base_chain(class).last().copied().unwrap_or(class);
        if Some(root) == stop_at {
            None
        } else {
            Some(root)
        }
    }

    /// First ancestor property named `name` that is declared there rather
    /// than re-declared from further up the chain.
    pub fn original_property_from_base_type(
        &self,
        class: ElementId,
        name: &str,
    ) -> Option<ElementId> {
        self.base_chain(class).into_iter().find_map(|ancestor| {
            let property = self.find_child(ancestor, name)?;
            let data = self.property(property)?;
            (!data.exists_in_base_type).then_some(property)
        })
    }

    /// Property named `name` on the class or the nearest ancestor declaring it
    pub fn find_property_in_hierarchy(&self, class: ElementId, name: &str) -> Option<ElementId> {
        std::iter::once(class)
            .chain(self.base_chain(class))
            .find_map(|owner| {
                self.find_child(owner, name)
                    .filter(|id| self.property(*id).is_some())
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::class::ClassData;
    use crate::element::{ElementId, NewElement};
    use crate::kinds::{ClassKind, PropertyKind};
    use crate::members::PropertyData;
    use crate::tree::CodeTree;
    use crate::types::TypeReference;

    fn add_model(tree: &mut CodeTree, parent: ElementId, name: &str, base: Option<ElementId>) -> ElementId {
        let mut data = ClassData::new(ClassKind::Model);
        if let Some(base) = base {
            data = data.with_base(TypeReference::declared(tree[base].name().to_string(), base));
        }
        tree.add_child(parent, NewElement::class(name, data)).unwrap()
    }

    #[test]
    fn external_base_is_not_resolved() {
        let mut tree = CodeTree::new();
        let data = ClassData::new(ClassKind::Model).with_base(TypeReference::external("ApiException"));
        let class = tree.add_child(tree.root(), NewElement::class("Error", data)).unwrap();
        assert_eq!(tree.base_class(class), None);
        assert_eq!(tree.greatest_grandparent(class, None), Some(class));
        assert_eq!(tree.greatest_grandparent(class, Some(class)), None);
    }

    #[test]
    fn inheritance_tree_is_root_first() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let entity = add_model(&mut tree, root, "Entity", None);
        let animal = add_model(&mut tree, root, "Animal", Some(entity));
        let dog = add_model(&mut tree, root, "Dog", Some(animal));

        assert_eq!(tree.inheritance_tree(dog, false, true), vec![entity, animal, dog]);
        assert_eq!(tree.inheritance_tree(dog, false, false), vec![entity, animal]);
        assert_eq!(tree.greatest_grandparent(dog, None), Some(entity));
        assert!(tree.derives_from(dog, entity));
        assert!(!tree.derives_from(entity, dog));
        assert!(!tree.derives_from(dog, dog));
    }

    #[test]
    fn namespace_bounded_tree_stops_at_foreign_base() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let core = tree.add_child(root, NewElement::namespace("core")).unwrap();
        let pets = tree.add_child(root, NewElement::namespace("pets")).unwrap();
        let entity = add_model(&mut tree, core, "Entity", None);
        let animal = add_model(&mut tree, pets, "Animal", Some(entity));
        let dog = add_model(&mut tree, pets, "Dog", Some(animal));

        assert_eq!(tree.inheritance_tree(dog, true, true), vec![animal, dog]);
        assert_eq!(tree.inheritance_tree(dog, true, false), vec![animal]);
    }

    #[test]
    fn original_property_skips_redeclarations() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let entity = add_model(&mut tree, root, "Entity", None);
        let animal = add_model(&mut tree, root, "Animal", Some(entity));
        let dog = add_model(&mut tree, root, "Dog", Some(animal));
        let id_type = TypeReference::primitive("string");
        let original = tree
            .add_child(
                entity,
                NewElement::property("id", PropertyData::new(PropertyKind::Custom, id_type.clone(), "id")),
            )
            .unwrap();
        tree.add_child(
            animal,
            NewElement::property("id", PropertyData::new(PropertyKind::Custom, id_type, "id").inherited()),
        )
        .unwrap();

        assert_eq!(tree.original_property_from_base_type(dog, "ID"), Some(original));
        assert_eq!(tree.find_property_in_hierarchy(dog, "id"), tree.find_child(animal, "id"));
        assert_eq!(tree.find_property_in_hierarchy(dog, "missing"), None);
    }
}
