//! Class declarations, implemented contracts and discriminator information

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::kinds::{ClassKind, InterfaceKind};
use crate::names::{eq_ignore_case, fold};
use crate::types::{ComposedType, TypeReference};

/// Class payload of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassData {
    pub kind: ClassKind,
    /// Single inheritance only
    pub base_type: Option<TypeReference>,
    pub implements: ImplementsSet,
    pub is_error_type: bool,
    /// Set when the class materializes one union/intersection type
    pub original_composed_type: Option<ComposedType>,
    pub discriminator: DiscriminatorInfo,
}

impl ClassData {
    pub fn new(kind: ClassKind) -> Self {
        Self {
            kind,
            base_type: None,
            implements: ImplementsSet::default(),
            is_error_type: false,
            original_composed_type: None,
            discriminator: DiscriminatorInfo::default(),
        }
    }

    pub fn with_base(mut self, base_type: TypeReference) -> Self {
        self.base_type = Some(base_type);
        self
    }

    pub fn with_composed_origin(mut self, composed: ComposedType) -> Self {
        self.original_composed_type = Some(composed);
        self
    }

    pub fn with_discriminator(mut self, discriminator: DiscriminatorInfo) -> Self {
        self.discriminator = discriminator;
        self
    }

    /// Whether generated bodies call into the base type. Error types keep
    /// their base for typing only.
    pub fn inherits(&self) -> bool {
        self.base_type.is_some() && !self.is_error_type
    }

    pub fn is_of_kind(&self, kinds: &[ClassKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

/// Interface payload of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceData {
    pub kind: InterfaceKind,
    pub implements: ImplementsSet,
}

impl InterfaceData {
    pub fn new(kind: InterfaceKind) -> Self {
        Self {
            kind,
            implements: ImplementsSet::default(),
        }
    }
}

/// Contracts implemented by a class or interface, keyed by name
/// case-insensitively and listed in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementsSet {
    contracts: BTreeMap<String, TypeReference>,
}

impl ImplementsSet {
    /// Adds a contract; an existing contract with the same name wins.
    pub fn add(&mut self, contract: TypeReference) -> bool {
        let key = fold(contract.name());
        if self.contracts.contains_key(&key) {
            return false;
        }
        self.contracts.insert(key, contract);
        true
    }

    pub fn find(&self, name: &str) -> Option<&TypeReference> {
        self.contracts.get(&fold(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<TypeReference> {
        self.contracts.remove(&fold(name))
    }

    /// Renames a contract. Returns false when `old_name` is not present or
    /// `new_name` is already taken; the set is left untouched in both cases.
    pub fn replace_by_name(&mut self, old_name: &str, new_name: &str) -> bool {
        let new_key = fold(new_name);
        if new_key != fold(old_name) && self.contracts.contains_key(&new_key) {
            return false;
        }
        let Some(mut contract) = self.remove(old_name) else {
            return false;
        };
        contract.rename(new_name);
        self.contracts.insert(new_key, contract);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeReference> {
        self.contracts.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TypeReference> {
        self.contracts.values_mut()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

/// One discriminator value and the concrete type it selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminatorMapping {
    pub key: String,
    pub target: TypeReference,
}

/// Wire-level type hint carried by polymorphic payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminatorInfo {
    /// Wire field carrying the concrete-type hint
    pub property_name: Option<String>,
    mappings: BTreeMap<String, DiscriminatorMapping>,
}

impl DiscriminatorInfo {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: Some(property_name.into()),
            mappings: BTreeMap::new(),
        }
    }

    /// Adds or replaces the mapping for `key` (compared case-insensitively)
    pub fn add_mapping(
        &mut self,
        key: impl Into<String>,
        target: TypeReference,
    ) -> Option<DiscriminatorMapping> {
        let key = key.into();
        self.mappings
            .insert(fold(&key), DiscriminatorMapping { key, target })
    }

    pub fn with_mapping(mut self, key: impl Into<String>, target: TypeReference) -> Self {
        self.add_mapping(key, target);
        self
    }

    pub fn remove_mapping(&mut self, key: &str) -> Option<DiscriminatorMapping> {
        self.mappings.remove(&fold(key))
    }

    pub fn mapping(&self, value: &str) -> Option<&DiscriminatorMapping> {
        self.mappings.get(&fold(value))
    }

    /// First mapping (in key order) whose target is the named type
    pub fn mapping_for_type(&self, type_name: &str) -> Option<&DiscriminatorMapping> {
        self.mappings()
            .find(|mapping| eq_ignore_case(mapping.target.name(), type_name))
    }

    /// Mappings sorted by key
    pub fn mappings(&self) -> impl Iterator<Item = &DiscriminatorMapping> {
        self.mappings.values()
    }

    pub fn mappings_mut(&mut self) -> impl Iterator<Item = &mut DiscriminatorMapping> {
        self.mappings.values_mut()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// At least one mapping has to be consulted at runtime
    pub fn has_parse_node_check(&self) -> bool {
        !self.mappings.is_empty()
    }

    /// A discriminator property and at least one mapping are both present
    pub fn has_basic_information(&self) -> bool {
        self.property_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
            && self.has_parse_node_check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implements_lookup_is_case_insensitive() {
        let mut set = ImplementsSet::default();
        assert!(set.add(TypeReference::external("Parsable")));
        assert!(!set.add(TypeReference::external("PARSABLE")));
        assert!(set.find("parsable").is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn implements_are_listed_by_name() {
        let mut set = ImplementsSet::default();
        set.add(TypeReference::external("Zeta"));
        set.add(TypeReference::external("alpha"));
        set.add(TypeReference::external("Beta"));
        let names: Vec<_> = set.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn error_types_do_not_inherit() {
        let model = ClassData::new(ClassKind::Model).with_base(TypeReference::external("Entity"));
        assert!(model.inherits());
        assert!(!ClassData::new(ClassKind::Model).inherits());

        let mut error = model.clone();
        error.is_error_type = true;
        assert!(!error.inherits());
    }

    #[test]
    fn replace_by_name_is_atomic() {
        let mut set = ImplementsSet::default();
        set.add(TypeReference::external("AdditionalDataHolder"));
        set.add(TypeReference::external("Parsable"));

        assert!(set.replace_by_name("AdditionalDataHolder", "IAdditionalDataHolder"));
        assert!(set.find("AdditionalDataHolder").is_none());
        assert_eq!(
            set.find("IAdditionalDataHolder").map(|c| c.name()),
            Some("IAdditionalDataHolder")
        );

        // target name taken: nothing moves
        assert!(!set.replace_by_name("IAdditionalDataHolder", "parsable"));
        assert!(set.find("IAdditionalDataHolder").is_some());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn mappings_are_case_insensitive_and_sorted() {
        let info = DiscriminatorInfo::new("@odata.type")
            .with_mapping("dog", TypeReference::external("Dog"))
            .with_mapping("Cat", TypeReference::external("Cat"));

        assert_eq!(info.mapping("DOG").map(|m| m.target.name()), Some("Dog"));
        let keys: Vec<_> = info.mappings().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["Cat", "dog"]);
        assert!(info.has_basic_information());
        assert_eq!(info.mapping_for_type("cat").map(|m| m.key.as_str()), Some("Cat"));
    }

    #[test]
    fn empty_discriminator_has_no_parse_node_check() {
        let info = DiscriminatorInfo::default();
        assert!(!info.has_parse_node_check());
        assert!(!info.has_basic_information());
    }
}
