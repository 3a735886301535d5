//! Property-based tests using QuickCheck

use quickcheck::{QuickCheck, TestResult};
use serde_json::json;

use sdkgen_codegen::eval::{Interpreter, JsonParseNode, RecordingWriter};

mod test_support;

/// Property: discriminator values select their mapping under any casing
#[test]
fn prop_discriminator_ignores_case() {
    fn prop(mask: Vec<bool>) -> TestResult {
        let (tree, synthesis) = test_support::synthesized(test_support::pet_description());
        let interpreter = Interpreter::new(&tree, &synthesis);
        let pet = test_support::class_named(&tree, "models.Pet");

        let key: String = "fish"
            .chars()
            .zip(mask.iter().chain(std::iter::repeat(&false)))
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();
        let payload = json!({ "petType": key });
        match interpreter.create(pet, &JsonParseNode(&payload)) {
            Ok(instance) => TestResult::from_bool(instance.type_name == "Fish"),
            Err(_) => TestResult::failed(),
        }
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<bool>) -> TestResult);
}

/// Property: scalar fields and unknown fields survive a read-write cycle
#[test]
fn prop_round_trip_preserves_fields() {
    fn prop(name: String, extra: i64) -> TestResult {
        let (tree, synthesis) = test_support::synthesized(test_support::pet_description());
        let interpreter = Interpreter::new(&tree, &synthesis);
        let pet = test_support::class_named(&tree, "models.Pet");

        let payload = json!({ "petType": "dog", "name": name, "barks": false, "extra": extra });
        let Ok(instance) = interpreter.deserialize(pet, &JsonParseNode(&payload)) else {
            return TestResult::failed();
        };
        let mut writer = RecordingWriter::new();
        if interpreter.serialize(&instance, &mut writer).is_err() {
            return TestResult::failed();
        }
        TestResult::from_bool(writer.to_json().ok() == Some(payload))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, i64) -> TestResult);
}
