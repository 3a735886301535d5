//! Polymorphism strategy and candidate resolution
//!
//! Computed once per class from its base chain, composed-type origin and
//! discriminator mappings. Synthesis matches on [`PolymorphismStrategy`]
//! instead of re-deriving flag combinations.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sdkgen_dom::names::compare_ignore_case;
use sdkgen_dom::{CodeTree, CompositionMode, ElementData, ElementId, PropertyKind, TypeTarget};

use crate::error::{Error, Result};
use crate::synthesis::instructions::ValueShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolymorphismStrategy {
    /// Plain subtype: discriminator mappings select a derived class
    Inherited,
    /// Wrapper holding exactly one of several alternatives
    UnionComposed,
    /// Wrapper whose facets may all be present at once
    IntersectionComposed,
    None,
}

/// Whether a candidate is chosen by type or by value shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorRole {
    /// Class-typed, not a collection
    Type,
    /// Everything else: scalars, enums, collections
    Value,
}

/// Ranking used to order candidates; lower is visited first for unions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeFactor {
    Class = 1,
    ClassCollection = 2,
    Enum = 3,
    Primitive = 4,
    Composed = 5,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub property: ElementId,
    pub name: String,
    pub wire_name: String,
    pub shape: ValueShape,
    pub role: SelectorRole,
    pub factor: TypeFactor,
    pub exists_in_base_type: bool,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMapping {
    pub key: String,
    pub type_name: String,
    pub target: Option<ElementId>,
}

/// Everything synthesis needs to know about a class's polymorphism
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub class: ElementId,
    pub class_name: String,
    pub strategy: PolymorphismStrategy,
    pub base_class: Option<ElementId>,
    /// Constructor, deserializer and serializer delegate to the base type
    pub inherits: bool,
    pub discriminator_property: Option<String>,
    /// Sorted by key, case-insensitively
    pub mappings: Vec<ResolvedMapping>,
    /// Custom properties, in name order
    pub candidates: Vec<Candidate>,
    pub should_write_parse_node_check: bool,
}

impl Resolution {
    /// Candidates in union visiting order: type factor, then name
    pub fn union_order(&self) -> Vec<&Candidate> {
        let mut ordered: Vec<&Candidate> = self.candidates.iter().collect();
        ordered.sort_by(|a, b| forward(a, b));
        ordered
    }

    /// Value selectors in intersection visiting order: reversed type factor,
    /// then name.
    ///
    /// Composed-typed properties are left out: an object payload always
    /// belongs to the structural facets.
    pub fn intersection_value_order(&self) -> Vec<&Candidate> {
        let mut ordered: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.role == SelectorRole::Value && c.factor != TypeFactor::Composed)
            .collect();
        ordered.sort_by(|a, b| {
            b.factor
                .cmp(&a.factor)
                .then_with(|| compare_ignore_case(&a.name, &b.name))
        });
        ordered
    }

    /// Class-typed non-collection candidates, in name order
    pub fn structural_facets(&self) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|c| c.role == SelectorRole::Type)
            .collect()
    }

    /// Discriminator key selecting `type_name`, falling back to the type name.
    ///
    /// The fallback only matters when the class has other mappings, since a
    /// discriminator is read only then.
    pub fn key_for_type(&self, type_name: &str) -> String {
        self.mappings
            .iter()
            .find(|m| sdkgen_dom::names::eq_ignore_case(&m.type_name, type_name))
            .map(|m| m.key.clone())
            .unwrap_or_else(|| type_name.to_string())
    }
}

fn forward(a: &Candidate, b: &Candidate) -> Ordering {
    a.factor
        .cmp(&b.factor)
        .then_with(|| compare_ignore_case(&a.name, &b.name))
}

/// Resolve the polymorphism strategy and candidates of `class`
pub fn resolve(tree: &CodeTree, class: ElementId) -> Result<Resolution> {
    let class_name = tree.qualified_name(class);
    let data = tree.class(class).ok_or_else(|| {
        Error::Structural(sdkgen_dom::Error::ElementKindMismatch {
            name: class_name.clone(),
            expected: "class",
        })
    })?;

    let base_class = tree.base_class(class);
    let has_mappings = data.discriminator.has_parse_node_check();
    let strategy = match data.original_composed_type.as_ref().map(|c| c.mode()) {
        Some(CompositionMode::Union) => PolymorphismStrategy::UnionComposed,
        Some(CompositionMode::Intersection) => PolymorphismStrategy::IntersectionComposed,
        None if base_class.is_some() || has_mappings => PolymorphismStrategy::Inherited,
        None => PolymorphismStrategy::None,
    };

    let mappings = data
        .discriminator
        .mappings()
        .map(|m| ResolvedMapping {
            key: m.key.clone(),
            type_name: m.target.name().to_string(),
            target: m.target.declared_target(),
        })
        .collect();

    let candidates = tree
        .properties_of_kind(class, &[PropertyKind::Custom])
        .into_iter()
        .filter_map(|element| {
            let property = element.as_property()?;
            let (role, factor) = classify(tree, &property.type_ref);
            Some(Candidate {
                property: element.id(),
                name: element.name().to_string(),
                wire_name: property.wire_name.clone(),
                shape: ValueShape::of(tree, &property.type_ref),
                role,
                factor,
                exists_in_base_type: property.exists_in_base_type,
                read_only: property.read_only,
            })
        })
        .collect::<Vec<_>>();

    let should_write_parse_node_check = strategy != PolymorphismStrategy::None
        && has_mappings
        && strategy != PolymorphismStrategy::IntersectionComposed;

    debug!(
        class = %class_name,
        strategy = ?strategy,
        candidates = candidates.len(),
        mappings = data.discriminator.mapping_count(),
        "resolved class"
    );

    Ok(Resolution {
        class,
        class_name,
        strategy,
        base_class,
        inherits: data.inherits(),
        discriminator_property: data.discriminator.property_name.clone(),
        mappings,
        candidates,
        should_write_parse_node_check,
    })
}

fn classify(tree: &CodeTree, type_ref: &sdkgen_dom::TypeReference) -> (SelectorRole, TypeFactor) {
    let definition = type_ref
        .declared_target()
        .and_then(|id| tree.get(id))
        .map(|e| e.data());
    let collection = type_ref.is_collection();
    match (&type_ref.target, definition) {
        (TypeTarget::Composed(_), _) => (SelectorRole::Value, TypeFactor::Composed),
        (_, Some(ElementData::Class(_))) if !collection => (SelectorRole::Type, TypeFactor::Class),
        (_, Some(ElementData::Class(_))) => (SelectorRole::Value, TypeFactor::ClassCollection),
        (_, Some(ElementData::Enum(_))) => (SelectorRole::Value, TypeFactor::Enum),
        _ => (SelectorRole::Value, TypeFactor::Primitive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkgen_dom::{
        ClassData, ClassKind, CollectionKind, ComposedType, DiscriminatorInfo, EnumData,
        NewElement, PropertyData, TypeReference,
    };

    fn custom(tree: &mut CodeTree, class: ElementId, name: &str, type_ref: TypeReference) {
        tree.add_child(
            class,
            NewElement::property(name, PropertyData::new(PropertyKind::Custom, type_ref, name)),
        )
        .unwrap();
    }

    #[test]
    fn strategy_follows_composition_then_inheritance() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let plain = tree
            .add_child(root, NewElement::class("Plain", ClassData::new(ClassKind::Model)))
            .unwrap();
        let mapped = tree
            .add_child(
                root,
                NewElement::class(
                    "Animal",
                    ClassData::new(ClassKind::Model).with_discriminator(
                        DiscriminatorInfo::new("kind")
                            .with_mapping("dog", TypeReference::external("Dog")),
                    ),
                ),
            )
            .unwrap();
        let composed = ComposedType::new(
            "PetOrString",
            CompositionMode::Intersection,
            vec![
                TypeReference::primitive("string"),
                TypeReference::external("Pet"),
            ],
        )
        .unwrap();
        let wrapper = tree
            .add_child(
                root,
                NewElement::class(
                    "PetOrString",
                    ClassData::new(ClassKind::Model)
                        .with_composed_origin(composed)
                        .with_discriminator(
                            DiscriminatorInfo::new("kind")
                                .with_mapping("pet", TypeReference::external("Pet")),
                        ),
                ),
            )
            .unwrap();

        assert_eq!(resolve(&tree, plain).unwrap().strategy, PolymorphismStrategy::None);
        let animal = resolve(&tree, mapped).unwrap();
        assert_eq!(animal.strategy, PolymorphismStrategy::Inherited);
        assert!(animal.should_write_parse_node_check);

        let intersection = resolve(&tree, wrapper).unwrap();
        assert_eq!(intersection.strategy, PolymorphismStrategy::IntersectionComposed);
        assert!(!intersection.should_write_parse_node_check);
    }

    #[test]
    fn union_order_puts_type_selectors_first() {
        let mut tree = CodeTree::new();
        let root = tree.root();
        let cat = tree
            .add_child(root, NewElement::class("Cat", ClassData::new(ClassKind::Model)))
            .unwrap();
        let dog = tree
            .add_child(root, NewElement::class("Dog", ClassData::new(ClassKind::Model)))
            .unwrap();
        let mood = tree
            .add_child(root, NewElement::enumeration("Mood", EnumData::with_options(["calm"])))
            .unwrap();
        let wrapper = tree
            .add_child(root, NewElement::class("Pet", ClassData::new(ClassKind::Model)))
            .unwrap();
        custom(&mut tree, wrapper, "aString", TypeReference::primitive("string"));
        custom(&mut tree, wrapper, "mood", TypeReference::declared("Mood", mood));
        custom(
            &mut tree,
            wrapper,
            "dogs",
            TypeReference::declared("Dog", dog).with_collection(CollectionKind::Array),
        );
        custom(&mut tree, wrapper, "dog", TypeReference::declared("Dog", dog));
        custom(&mut tree, wrapper, "Cat", TypeReference::declared("Cat", cat));

        let resolution = resolve(&tree, wrapper).unwrap();
        let union: Vec<_> = resolution.union_order().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(union, vec!["Cat", "dog", "dogs", "mood", "aString"]);

        let intersection: Vec<_> = resolution
            .intersection_value_order()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(intersection, vec!["aString", "mood", "dogs"]);

        let facets: Vec<_> = resolution
            .structural_facets()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(facets, vec!["Cat", "dog"]);
    }
}
