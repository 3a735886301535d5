//! Naming and call-name conventions of a target backend

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

use crate::synthesis::{ValueAccess, ValueShape};

/// Identifier casing and serialization call names for one backend
pub trait Conventions {
    /// Name of a property, method or parameter
    fn member_name(&self, name: &str) -> String;

    /// Name of a class, interface or enum
    fn type_name(&self, name: &str) -> String;

    /// File a class is written to
    fn file_name(&self, class_name: &str) -> String;

    /// Scalar token for a primitive type (`string` -> `str`)
    fn primitive_token(&self, primitive: &str) -> String;

    fn nullable(&self, type_name: &str) -> String {
        format!("{type_name}?")
    }

    fn read_call(&self, shape: &ValueShape) -> String {
        match shape.access {
            ValueAccess::Primitive => {
                format!("get_{}_value", self.primitive_token(&shape.type_name))
            }
            ValueAccess::Enum => "get_enum_value".to_string(),
            ValueAccess::Object => "get_object_value".to_string(),
            ValueAccess::CollectionOfPrimitive => "get_collection_of_primitive_values".to_string(),
            ValueAccess::CollectionOfEnum => "get_collection_of_enum_values".to_string(),
            ValueAccess::CollectionOfObject => "get_collection_of_object_values".to_string(),
        }
    }

    fn write_call(&self, shape: &ValueShape) -> String {
        match shape.access {
            ValueAccess::Primitive => {
                format!("write_{}_value", self.primitive_token(&shape.type_name))
            }
            ValueAccess::Enum => "write_enum_value".to_string(),
            ValueAccess::Object => "write_object_value".to_string(),
            ValueAccess::CollectionOfPrimitive => "write_collection_of_primitive_values".to_string(),
            ValueAccess::CollectionOfEnum => "write_collection_of_enum_values".to_string(),
            ValueAccess::CollectionOfObject => "write_collection_of_object_values".to_string(),
        }
    }
}

/// snake_case members, UpperCamelCase types
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConventions;

impl Conventions for DefaultConventions {
    fn member_name(&self, name: &str) -> String {
        name.to_snake_case()
    }

    fn type_name(&self, name: &str) -> String {
        name.to_upper_camel_case()
    }

    fn file_name(&self, class_name: &str) -> String {
        format!("{}.outline", class_name.to_snake_case())
    }

    fn primitive_token(&self, primitive: &str) -> String {
        let token = match primitive.to_ascii_lowercase().as_str() {
            "string" => "str",
            "boolean" | "bool" => "bool",
            "integer" | "int32" | "int64" | "int16" | "sbyte" | "byte" | "long" | "int" => "int",
            "float" | "double" | "decimal" | "number" => "float",
            "guid" | "uuid" => "uuid",
            "binary" | "base64" | "base64url" | "bytes" => "bytes",
            "datetimeoffset" | "datetime" | "date-time" => "datetime",
            "date" | "dateonly" => "date",
            "time" | "timeonly" => "time",
            "duration" | "timespan" => "timedelta",
            other => return other.to_snake_case(),
        };
        token.to_string()
    }
}

/// lowerCamelCase members, for backends following Java/TypeScript style
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseConventions;

impl Conventions for CamelCaseConventions {
    fn member_name(&self, name: &str) -> String {
        name.to_lower_camel_case()
    }

    fn type_name(&self, name: &str) -> String {
        name.to_upper_camel_case()
    }

    fn file_name(&self, class_name: &str) -> String {
        format!("{}.outline", class_name.to_upper_camel_case())
    }

    fn primitive_token(&self, primitive: &str) -> String {
        DefaultConventions.primitive_token(primitive).to_upper_camel_case()
    }

    fn read_call(&self, shape: &ValueShape) -> String {
        DefaultConventions.read_call(shape).to_lower_camel_case()
    }

    fn write_call(&self, shape: &ValueShape) -> String {
        DefaultConventions.write_call(shape).to_lower_camel_case()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(access: ValueAccess, type_name: &str) -> ValueShape {
        ValueShape {
            access,
            type_name: type_name.to_string(),
            target: None,
        }
    }

    #[test]
    fn test_default_call_names() {
        let conventions = DefaultConventions;
        assert_eq!(conventions.read_call(&shape(ValueAccess::Primitive, "string")), "get_str_value");
        assert_eq!(
            conventions.write_call(&shape(ValueAccess::Primitive, "DateTimeOffset")),
            "write_datetime_value"
        );
        assert_eq!(
            conventions.write_call(&shape(ValueAccess::CollectionOfObject, "Pet")),
            "write_collection_of_object_values"
        );
        assert_eq!(conventions.member_name("petType"), "pet_type");
        assert_eq!(conventions.file_name("PetOwner"), "pet_owner.outline");
    }

    #[test]
    fn test_camel_case_call_names() {
        let conventions = CamelCaseConventions;
        assert_eq!(conventions.read_call(&shape(ValueAccess::Primitive, "string")), "getStrValue");
        assert_eq!(conventions.member_name("pet_type"), "petType");
    }
}
