use std::fs;

use sdkgen_codegen::conventions::CamelCaseConventions;
use sdkgen_codegen::generators::outline::OutlineGenerator;
use sdkgen_codegen::generators::GeneratorConfig;
use sdkgen_codegen::utils::write_modules;
use sdkgen_codegen::CodeGenerator;

mod test_support;

use test_support::load;

fn pet_generator() -> CodeGenerator {
    CodeGenerator::from_tree(load(test_support::pet_description()), GeneratorConfig::default())
        .unwrap()
}

#[test]
fn test_one_file_per_class() {
    let output = pet_generator()
        .generate(OutlineGenerator::new_default())
        .unwrap();

    let mut names: Vec<_> = output.modules.keys().cloned().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["models_dog.outline", "models_fish.outline", "models_pet.outline"]
    );

    let dog = &output.modules["models_dog.outline"];
    assert!(dog.contains("class Dog : Pet"));
    assert!(dog.contains("super()"));

    let pet = &output.modules["models_pet.outline"];
    assert!(pet.starts_with("// models.Pet (Inherited)"));
    assert!(pet.contains("if discriminator == \"dog\""));
    assert!(pet.contains("else if discriminator == \"fish\""));
    assert!(pet.contains("fn create_from_discriminator_value [Factory]"));
}

#[test]
fn test_camel_case_conventions() {
    let generator =
        OutlineGenerator::with_conventions(GeneratorConfig::default(), CamelCaseConventions);
    let output = pet_generator().generate(generator).unwrap();

    let pet = &output.modules["ModelsPet.outline"];
    assert!(pet.contains("fn createFromDiscriminatorValue [Factory]"));
    assert!(pet.contains("petType"));
}

#[test]
fn test_failures_are_listed() {
    let codegen = CodeGenerator::from_tree(
        load(test_support::request_builder_description()),
        GeneratorConfig::default(),
    )
    .unwrap();
    let output = codegen.generate(OutlineGenerator::new_default()).unwrap();

    let builder = &output.modules["api_pets_request_builder.outline"];
    assert!(builder.contains("// skipped api.PetsRequestBuilder.delete"));
    assert!(builder.contains("fn by_pet_id [IndexerBackwardCompatibility]"));
}

#[test]
fn test_output_is_deterministic() {
    let codegen = pet_generator();
    let first = codegen.generate(OutlineGenerator::new_default()).unwrap();
    let second = codegen.generate(OutlineGenerator::new_default()).unwrap();
    assert_eq!(first.modules, second.modules);
}

#[test]
fn test_docs_follow_config() {
    let mut description = test_support::pet_description();
    description["namespaces"][0]["classes"][0]["description"] = "A pet of any kind".into();
    let tree = load(description);

    let with_docs = CodeGenerator::from_tree(tree.clone(), GeneratorConfig::default())
        .unwrap()
        .generate(OutlineGenerator::new_default())
        .unwrap();
    assert!(with_docs.modules["models_pet.outline"].contains("/// A pet of any kind"));

    let config = GeneratorConfig {
        generate_docs: false,
        ..GeneratorConfig::default()
    };
    let without_docs = CodeGenerator::from_tree(tree, config.clone())
        .unwrap()
        .generate(OutlineGenerator::new(config))
        .unwrap();
    assert!(!without_docs.modules["models_pet.outline"].contains("A pet of any kind"));
}

#[test]
fn test_write_modules_creates_files() {
    let output = pet_generator()
        .generate(OutlineGenerator::new_default())
        .unwrap();
    let dir = std::env::temp_dir().join(format!("sdkgen-outline-{}", std::process::id()));

    write_modules(&dir, &output.modules).unwrap();
    let written = fs::read_to_string(dir.join("models_pet.outline")).unwrap();
    assert_eq!(written, output.modules["models_pet.outline"]);

    fs::remove_dir_all(&dir).unwrap();
}
