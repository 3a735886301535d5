//! Property-based tests using QuickCheck

use quickcheck::{QuickCheck, TestResult};
use sdkgen_dom::{Error, NewElement, MethodData, MethodKind};

mod test_support;

/// Property: the base relation is antisymmetric along any chain
#[test]
fn prop_derives_from_antisymmetric() {
    fn prop(len: u8, a: u8, b: u8) -> TestResult {
        let len = (len % 12) as usize + 2;
        let (a, b) = (a as usize % len, b as usize % len);
        if a == b {
            return TestResult::discard();
        }
        let (tree, ids) = test_support::chain(len);
        let (base, derived) = if a < b { (ids[a], ids[b]) } else { (ids[b], ids[a]) };

        TestResult::from_bool(tree.derives_from(derived, base) && !tree.derives_from(base, derived))
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(u8, u8, u8) -> TestResult);
}

/// Property: a case-insensitive duplicate is rejected and nothing changes
#[test]
fn prop_duplicate_sibling_rejected() {
    fn prop(names: Vec<String>, pick: usize, upper: bool) -> TestResult {
        let names: Vec<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
        if names.is_empty() {
            return TestResult::discard();
        }
        let (mut tree, ids) = test_support::chain(1);
        let class = ids[0];
        let mut accepted = Vec::new();
        for name in &names {
            if tree
                .add_child(class, NewElement::method(name.clone(), MethodData::new(MethodKind::Custom)))
                .is_ok()
            {
                accepted.push(name.clone());
            }
        }

        let existing = &accepted[pick % accepted.len()];
        let duplicate = if upper {
            existing.to_uppercase()
        } else {
            existing.to_lowercase()
        };
        if duplicate.to_lowercase() != existing.to_lowercase() {
            // case mapping changed the folded key (e.g. special casing); not a duplicate
            return TestResult::discard();
        }

        let before = tree[class].children().to_vec();
        let len_before = tree.len();
        let result = tree.add_child(class, NewElement::method(duplicate, MethodData::new(MethodKind::Custom)));

        TestResult::from_bool(
            matches!(result, Err(Error::DuplicateName { .. }))
                && tree[class].children() == before.as_slice()
                && tree.len() == len_before,
        )
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<String>, usize, bool) -> TestResult);
}
