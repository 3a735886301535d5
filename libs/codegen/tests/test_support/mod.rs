#![allow(dead_code)]

use serde_json::{json, Value};

use sdkgen_codegen::generators::GeneratorConfig;
use sdkgen_codegen::parser::{load_description, Description};
use sdkgen_codegen::synthesis::{synthesize_tree, TreeSynthesis};
use sdkgen_dom::{CodeTree, ElementId};

/// Factory, deserializer and serializer of a model class
pub fn model_methods(type_name: &str) -> Value {
    json!([
        {
            "name": "createFromDiscriminatorValue",
            "kind": "Factory",
            "isStatic": true,
            "returnType": type_name,
            "parameters": [
                { "name": "parseNode", "kind": "ParseNode", "type": { "name": "ParseNode", "external": true } }
            ]
        },
        {
            "name": "getFieldDeserializers",
            "kind": "Deserializer",
            "returnType": { "name": "object", "collection": "Indexed" }
        },
        {
            "name": "serialize",
            "kind": "Serializer",
            "parameters": [
                { "name": "writer", "kind": "Serializer", "type": { "name": "SerializationWriter", "external": true } }
            ]
        }
    ])
}

fn model(name: &str, properties: Value) -> Value {
    json!({ "name": name, "properties": properties, "methods": model_methods(name) })
}

/// `Pet` with `Dog` and `Fish` selected by `petType`
pub fn pet_description() -> Value {
    let mut pet = model(
        "Pet",
        json!([
            { "name": "petType", "type": "string" },
            { "name": "name", "type": "string" },
            { "name": "additionalData", "kind": "AdditionalData", "type": { "name": "object", "collection": "Indexed" } }
        ]),
    );
    pet["discriminator"] = json!({
        "propertyName": "petType",
        "mappings": { "dog": "Dog", "fish": "Fish" }
    });
    let mut dog = model("Dog", json!([{ "name": "barks", "type": "boolean" }]));
    dog["base"] = json!("Pet");
    let mut fish = model("Fish", json!([{ "name": "fins", "type": "int32" }]));
    fish["base"] = json!("Pet");

    json!({
        "namespaces": [ { "name": "models", "classes": [pet, dog, fish] } ]
    })
}

/// `Cat | Dog | string`, discriminated by `@type`
pub fn union_description() -> Value {
    let cat = model("Cat", json!([{ "name": "name", "type": "string" }]));
    let dog = model("Dog", json!([{ "name": "bark", "type": "string" }]));
    let mut wrapper = model(
        "CatOrDogOrString",
        json!([
            { "name": "cat", "type": "Cat" },
            { "name": "dog", "type": "Dog" },
            { "name": "string", "type": "string" }
        ]),
    );
    wrapper["composed"] = json!({
        "name": "CatOrDogOrString",
        "mode": "Union",
        "members": ["Cat", "Dog", "string"]
    });
    wrapper["discriminator"] = json!({
        "propertyName": "@type",
        "mappings": { "#cat": "Cat", "#dog": "Dog" }
    });
    json!({ "classes": [cat, dog, wrapper] })
}

/// `Owner & Address & string`
pub fn intersection_description() -> Value {
    let owner = model("Owner", json!([{ "name": "ownerName", "type": "string" }]));
    let address = model("Address", json!([{ "name": "street", "type": "string" }]));
    let mut wrapper = model(
        "OwnerAndAddress",
        json!([
            { "name": "owner", "type": "Owner" },
            { "name": "address", "type": "Address" },
            { "name": "string", "type": "string" }
        ]),
    );
    wrapper["composed"] = json!({
        "name": "OwnerAndAddress",
        "mode": "Intersection",
        "members": ["Owner", "Address", "string"]
    });
    json!({ "classes": [owner, address, wrapper] })
}

/// `/pets` request builder with configuration, query parameters and an indexer
pub fn request_builder_description() -> Value {
    let external = |name: &str| json!({ "name": name, "external": true });
    json!({
        "namespaces": [
            {
                "name": "models",
                "classes": [
                    model("Pet", json!([{ "name": "name", "type": "string" }])),
                    { "name": "Error", "isErrorType": true, "base": external("ApiError"),
                      "properties": [ { "name": "message", "type": "string" } ] }
                ]
            },
            {
                "name": "api",
                "classes": [
                    {
                        "name": "PetsRequestBuilder",
                        "kind": "RequestBuilder",
                        "base": external("BaseRequestBuilder"),
                        "properties": [
                            { "name": "pathParameters", "kind": "PathParameters", "type": { "name": "string", "collection": "Indexed" } },
                            { "name": "requestAdapter", "kind": "RequestAdapter", "type": external("RequestAdapter") },
                            { "name": "urlTemplate", "kind": "UrlTemplate", "type": "string", "defaultValue": "\"{+baseurl}/pets{?limit,%24filter}\"" }
                        ],
                        "methods": [
                            {
                                "name": "constructor",
                                "kind": "Constructor",
                                "parameters": [
                                    { "name": "requestAdapter", "kind": "RequestAdapter", "type": external("RequestAdapter") },
                                    { "name": "pathParameters", "kind": "PathParameters", "type": { "name": "string", "collection": "Indexed" } }
                                ]
                            },
                            {
                                "name": "withUrl",
                                "kind": "RawUrlConstructor",
                                "parameters": [
                                    { "name": "requestAdapter", "kind": "RequestAdapter", "type": external("RequestAdapter") },
                                    { "name": "rawUrl", "kind": "RawUrl", "type": "string" }
                                ]
                            },
                            {
                                "name": "toGetRequestInformation",
                                "kind": "RequestGenerator",
                                "httpMethod": "GET",
                                "acceptedResponseTypes": ["application/json", "text/plain"],
                                "returnType": external("RequestInformation"),
                                "parameters": [
                                    { "name": "requestConfiguration", "kind": "RequestConfiguration", "optional": true, "type": "PetsRequestConfiguration" }
                                ]
                            },
                            {
                                "name": "toPostRequestInformation",
                                "kind": "RequestGenerator",
                                "httpMethod": "POST",
                                "requestBodyContentType": "application/json",
                                "returnType": external("RequestInformation"),
                                "parameters": [
                                    { "name": "body", "kind": "RequestBody", "type": "Pet" }
                                ]
                            },
                            {
                                "name": "get",
                                "kind": "RequestExecutor",
                                "httpMethod": "GET",
                                "isAsync": true,
                                "returnType": { "name": "Pet", "collection": "Array" },
                                "errorMappings": { "4XX": "Error", "5xx": "Error" },
                                "parameters": [
                                    { "name": "requestConfiguration", "kind": "RequestConfiguration", "optional": true, "type": "PetsRequestConfiguration" }
                                ]
                            },
                            {
                                "name": "post",
                                "kind": "RequestExecutor",
                                "httpMethod": "POST",
                                "returnType": "Pet",
                                "parameters": [
                                    { "name": "body", "kind": "RequestBody", "type": "Pet" }
                                ]
                            },
                            {
                                "name": "put",
                                "kind": "RequestExecutor",
                                "httpMethod": "PUT",
                                "returnType": "void"
                            },
                            {
                                "name": "delete",
                                "kind": "RequestExecutor",
                                "returnType": "void"
                            }
                        ],
                        "indexer": {
                            "keyName": "petId",
                            "keyType": "string",
                            "serializationName": "pet%2Did",
                            "returnType": "PetItemRequestBuilder"
                        }
                    },
                    {
                        "name": "PetItemRequestBuilder",
                        "kind": "RequestBuilder",
                        "base": external("BaseRequestBuilder")
                    },
                    {
                        "name": "PetsRequestConfiguration",
                        "kind": "RequestConfiguration",
                        "properties": [
                            { "name": "headers", "kind": "Headers", "type": external("HeadersCollection") },
                            { "name": "options", "kind": "Options", "type": { "name": "RequestOption", "external": true, "collection": "Array" } },
                            { "name": "queryParameters", "kind": "QueryParameters", "type": "PetsQueryParameters" }
                        ]
                    },
                    {
                        "name": "PetsQueryParameters",
                        "kind": "QueryParameters",
                        "properties": [
                            { "name": "limit", "kind": "QueryParameter", "type": "int32" },
                            { "name": "dollarFilter", "kind": "QueryParameter", "type": "string", "wireName": "%24filter", "isNameEscaped": true }
                        ],
                        "methods": [
                            {
                                "name": "getQueryParameter",
                                "kind": "QueryParametersMapper",
                                "returnType": "string",
                                "parameters": [
                                    { "name": "originalName", "kind": "QueryParametersMapperParameter", "type": "string" }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

pub fn load(description: Value) -> CodeTree {
    let description: Description = serde_json::from_value(description).expect("description shape");
    load_description(&description).expect("valid description")
}

/// Load and synthesize with the default configuration
pub fn synthesized(description: Value) -> (CodeTree, TreeSynthesis) {
    let tree = load(description);
    let synthesis = synthesize_tree(&tree, &GeneratorConfig::default()).expect("synthesis");
    (tree, synthesis)
}

pub fn class_named(tree: &CodeTree, qualified: &str) -> ElementId {
    tree.classes()
        .into_iter()
        .find(|id| tree.qualified_name(*id) == qualified)
        .unwrap_or_else(|| panic!("no class {qualified}"))
}
