#![allow(dead_code)]

use sdkgen_dom::{
    ClassData, ClassKind, CodeTree, ElementId, NewElement, PropertyData, PropertyKind,
    TypeReference,
};

/// Adds a model class under `parent`, optionally deriving from `base`
pub fn model(tree: &mut CodeTree, parent: ElementId, name: &str, base: Option<ElementId>) -> ElementId {
    let mut data = ClassData::new(ClassKind::Model);
    if let Some(base) = base {
        let base_name = tree[base].name().to_string();
        data = data.with_base(TypeReference::declared(base_name, base));
    }
    tree.add_child(parent, NewElement::class(name, data))
        .expect("model class")
}

pub fn string_property(tree: &mut CodeTree, class: ElementId, name: &str) -> ElementId {
    tree.add_child(
        class,
        NewElement::property(
            name,
            PropertyData::new(PropertyKind::Custom, TypeReference::primitive("string"), name),
        ),
    )
    .expect("string property")
}

/// Linear chain `C0 <- C1 <- ... <- C{len-1}` in the root namespace
pub fn chain(len: usize) -> (CodeTree, Vec<ElementId>) {
    let mut tree = CodeTree::new();
    let root = tree.root();
    let mut ids: Vec<ElementId> = Vec::with_capacity(len);
    for i in 0..len {
        let base = ids.last().copied();
        ids.push(model(&mut tree, root, &format!("C{i}"), base));
    }
    (tree, ids)
}
