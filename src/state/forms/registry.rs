//! Field registry: the set of currently mounted fields of one form

use super::field::{FieldSpec, FieldValue, FormField};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Snapshot of field values keyed by field name
pub type FormValues = BTreeMap<String, FieldValue>;

/// Returned by [`FieldRegistry::register`]; identifies one particular mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    pub name: String,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    field: FormField,
    generation: u64,
}

/// Fields keyed by name. Registering a duplicate name replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    slots: BTreeMap<String, Slot>,
    next_generation: u64,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or remount) a field
    pub fn register(&mut self, spec: FieldSpec) -> FieldHandle {
        self.next_generation += 1;
        let generation = self.next_generation;
        let name = spec.name.clone();
        if self.slots.contains_key(&name) {
            tracing::debug!(field = %name, "replacing existing field registration");
        }
        self.slots.insert(
            name.clone(),
            Slot {
                field: FormField::from_spec(spec),
                generation,
            },
        );
        FieldHandle { name, generation }
    }

    /// Remove a field by name. Returns false if it was not registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.slots.remove(name).is_some()
    }

    /// Remove the field only if `handle` still refers to the current mount
    pub fn release(&mut self, handle: &FieldHandle) -> bool {
        match self.slots.get(&handle.name) {
            Some(slot) if slot.generation == handle.generation => {
                self.slots.remove(&handle.name);
                true
            }
            Some(_) => {
                tracing::debug!(field = %handle.name, "ignoring release of stale field handle");
                false
            }
            None => false,
        }
    }

    /// Update a field's value and validity together.
    /// Returns false when no field with that name is registered.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) => {
                slot.field.set_value(value);
                true
            }
            None => {
                tracing::warn!(field = %name, "set_value on unregistered field");
                false
            }
        }
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.slots.get(name).map(|slot| slot.field.value())
    }

    /// Per-field validity; unknown fields report false
    pub fn is_valid(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.field.is_valid())
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.slots.get(name).map(|slot| &slot.field)
    }

    /// Conjunction of all required fields' validity (true when none)
    pub fn all_valid(&self) -> bool {
        self.slots
            .values()
            .filter(|slot| slot.field.required)
            .all(|slot| slot.field.is_valid())
    }

    pub fn values(&self) -> FormValues {
        self.slots
            .iter()
            .map(|(name, slot)| (name.clone(), slot.field.value().clone()))
            .collect()
    }

    /// Values as a JSON object, ready to deserialize into a typed model
    pub fn values_json(&self) -> Value {
        let map: Map<String, Value> = self
            .slots
            .iter()
            .filter_map(|(name, slot)| {
                serde_json::to_value(slot.field.value())
                    .ok()
                    .map(|v| (name.clone(), v))
            })
            .collect();
        Value::Object(map)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_registry_is_vacuously_valid() {
        let registry = FieldRegistry::new();
        assert!(registry.all_valid());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_optional_fields_do_not_affect_validity() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("nickname").validator(|v| !v.is_empty()));
        assert!(!registry.is_valid("nickname"));
        assert!(registry.all_valid());
    }

    #[test]
    fn test_required_field_drives_aggregate() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("name").required());
        assert!(!registry.all_valid());

        registry.set_value("name", "Ada".into());
        assert!(registry.is_valid("name"));
        assert!(registry.all_valid());

        registry.set_value("name", "".into());
        assert!(!registry.all_valid());
    }

    #[test]
    fn test_aggregate_is_conjunction_of_required_fields() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("name").required().initial("Ada"));
        registry.register(FieldSpec::new("email").required());
        assert!(!registry.all_valid());

        registry.set_value("email", "ada@example.com".into());
        assert!(registry.all_valid());
    }

    #[test]
    fn test_duplicate_registration_replaces_prior() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("name").required().initial("Ada"));
        registry.register(FieldSpec::new("name"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.value("name"), Some(&FieldValue::default()));
        // The replacement is optional, so the form is valid again.
        assert!(registry.all_valid());
    }

    #[test]
    fn test_unregister_removes_from_aggregate() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("name").required());
        assert!(!registry.all_valid());

        assert!(registry.unregister("name"));
        assert!(registry.all_valid());
        assert!(!registry.unregister("name"));
    }

    #[test]
    fn test_stale_handle_does_not_remove_remounted_field() {
        let mut registry = FieldRegistry::new();
        let first = registry.register(FieldSpec::new("name").required());
        let second = registry.register(FieldSpec::new("name").required());

        assert!(!registry.release(&first));
        assert!(registry.value("name").is_some());
        assert!(registry.release(&second));
        assert!(registry.value("name").is_none());
    }

    #[test]
    fn test_set_value_on_unknown_field() {
        let mut registry = FieldRegistry::new();
        assert!(!registry.set_value("missing", "x".into()));
        assert!(!registry.is_valid("missing"));
        assert!(registry.value("missing").is_none());
    }

    #[test]
    fn test_values_snapshot() {
        let mut registry = FieldRegistry::new();
        registry.register(FieldSpec::new("name").initial("Ada"));
        registry.register(FieldSpec::new("email").initial("ada@example.com"));

        let values = registry.values();
        assert_eq!(values.get("name"), Some(&FieldValue::from("Ada")));
        assert_eq!(
            registry.values_json(),
            serde_json::json!({"name": "Ada", "email": "ada@example.com"})
        );
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["email", "name"]);
    }

    #[test]
    fn test_validity_matches_required_fields_over_edit_sequence() {
        let mut registry = FieldRegistry::new();
        let edits: &[(&str, &str)] = &[
            ("a", ""),
            ("b", "x"),
            ("a", "y"),
            ("b", ""),
            ("b", "z"),
        ];
        registry.register(FieldSpec::new("a").required());
        registry.register(FieldSpec::new("b").required());
        registry.register(FieldSpec::new("c"));

        for (name, value) in edits {
            registry.set_value(name, (*value).into());
            let expected = ["a", "b"].iter().all(|n| registry.is_valid(n));
            assert_eq!(registry.all_valid(), expected);
        }
        assert!(registry.all_valid());
    }
}
