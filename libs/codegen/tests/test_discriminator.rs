use serde_json::json;

use sdkgen_codegen::discriminator::{resolve, PolymorphismStrategy, SelectorRole, TypeFactor};
use sdkgen_codegen::synthesis::ValueAccess;

mod test_support;

use test_support::{class_named, load};

#[test]
fn test_strategy_per_fixture() {
    let pets = load(test_support::pet_description());
    let pet = resolve(&pets, class_named(&pets, "models.Pet")).unwrap();
    assert_eq!(pet.strategy, PolymorphismStrategy::Inherited);
    assert!(pet.should_write_parse_node_check);
    assert_eq!(pet.discriminator_property.as_deref(), Some("petType"));

    let fish = resolve(&pets, class_named(&pets, "models.Fish")).unwrap();
    assert_eq!(fish.strategy, PolymorphismStrategy::Inherited);
    assert!(!fish.should_write_parse_node_check);
    assert_eq!(fish.base_class, Some(class_named(&pets, "models.Pet")));

    let unions = load(test_support::union_description());
    let wrapper = resolve(&unions, class_named(&unions, "CatOrDogOrString")).unwrap();
    assert_eq!(wrapper.strategy, PolymorphismStrategy::UnionComposed);
    assert!(wrapper.should_write_parse_node_check);
    let cat = resolve(&unions, class_named(&unions, "Cat")).unwrap();
    assert_eq!(cat.strategy, PolymorphismStrategy::None);

    let intersections = load(test_support::intersection_description());
    let both = resolve(&intersections, class_named(&intersections, "OwnerAndAddress")).unwrap();
    assert_eq!(both.strategy, PolymorphismStrategy::IntersectionComposed);
    assert!(!both.should_write_parse_node_check);
}

#[test]
fn test_mappings_sorted_and_resolved() {
    let tree = load(test_support::pet_description());
    let pet = resolve(&tree, class_named(&tree, "models.Pet")).unwrap();

    let keys: Vec<_> = pet.mappings.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["dog", "fish"]);
    assert_eq!(pet.mappings[1].target, Some(class_named(&tree, "models.Fish")));
    assert_eq!(pet.key_for_type("fish"), "fish");
}

#[test]
fn test_key_for_type_falls_back_to_type_name() {
    let tree = load(test_support::union_description());
    let wrapper = resolve(&tree, class_named(&tree, "CatOrDogOrString")).unwrap();

    assert_eq!(wrapper.key_for_type("Cat"), "#cat");
    assert_eq!(wrapper.key_for_type("DOG"), "#dog");
    assert_eq!(wrapper.key_for_type("Hamster"), "Hamster");
}

#[test]
fn test_candidates_are_custom_properties_only() {
    let tree = load(test_support::pet_description());
    let pet = resolve(&tree, class_named(&tree, "models.Pet")).unwrap();

    let names: Vec<_> = pet.candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["name", "petType"]);
    assert!(pet
        .candidates
        .iter()
        .all(|c| c.shape.access == ValueAccess::Primitive));
}

#[test]
fn test_inline_composed_property_is_a_value_selector() {
    let tree = load(json!({
        "classes": [
            { "name": "Cat" },
            {
                "name": "Holder",
                "properties": [
                    { "name": "either", "type": {
                        "composed": { "name": "CatOrString", "mode": "Union", "members": ["Cat", "string"] }
                    } },
                    { "name": "cat", "type": "Cat" },
                    { "name": "cats", "type": { "name": "Cat", "collection": "Array" } }
                ]
            }
        ]
    }));
    let holder = resolve(&tree, class_named(&tree, "Holder")).unwrap();
    let by_name = |name: &str| {
        holder
            .candidates
            .iter()
            .find(|c| c.name == name)
            .map(|c| (c.role, c.factor))
            .unwrap()
    };

    assert_eq!(by_name("either"), (SelectorRole::Value, TypeFactor::Composed));
    assert_eq!(by_name("cat"), (SelectorRole::Type, TypeFactor::Class));
    assert_eq!(by_name("cats"), (SelectorRole::Value, TypeFactor::ClassCollection));

    let union: Vec<_> = holder.union_order().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(union, vec!["cat", "cats", "either"]);

    let intersection: Vec<_> = holder
        .intersection_value_order()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(intersection, vec!["cats"]);
}

#[test]
fn test_inherited_properties_stay_candidates() {
    let mut description = test_support::pet_description();
    description["namespaces"][0]["classes"][1]["properties"] = json!([
        { "name": "barks", "type": "boolean" },
        { "name": "name", "type": "string", "existsInBaseType": true }
    ]);
    let tree = load(description);
    let dog = resolve(&tree, class_named(&tree, "models.Dog")).unwrap();

    let name = dog.candidates.iter().find(|c| c.name == "name").unwrap();
    assert!(name.exists_in_base_type);
    assert_eq!(dog.candidates.len(), 2);
}
