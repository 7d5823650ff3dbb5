// Strongly-typed IR shared by inference and declaration synthesis. No serde_json::Value here.

use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primitive classification behind a (possibly relabelled) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    String,
    Number,
    Boolean,
    Object,
    Unknown,
}

impl TypeKind {
    pub const fn default_label(self) -> &'static str {
        match self {
            TypeKind::String => "string",
            TypeKind::Number => "number",
            TypeKind::Boolean => "boolean",
            TypeKind::Object => "object",
            TypeKind::Unknown => "unknown",
        }
    }

    /// Kind whose default label is `label`, if any.
    pub fn from_default_label(label: &str) -> Option<Self> {
        [Self::String, Self::Number, Self::Boolean, Self::Object, Self::Unknown]
            .into_iter()
            .find(|kind| kind.default_label() == label)
    }
}

/// Inferred type of a single field.
///
/// `kind` may be missing from serialized stores; it is then recovered from
/// `objectKeys` or the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredValueType")]
pub struct ValueTypeConfiguration {
    pub kind: TypeKind,
    /// Label rendered into declarations (`kind`'s default unless overridden).
    #[serde(rename = "type")]
    pub label: String,
    pub optional: bool,
    pub is_array: bool,
    /// Only for non-empty objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_keys: Option<TypeConfigurationObject>,
}

/// Field name → inferred type, in key insertion order.
pub type TypeConfigurationObject = IndexMap<String, ValueTypeConfiguration>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredValueType {
    #[serde(default)]
    kind: Option<TypeKind>,
    #[serde(rename = "type")]
    label: String,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    is_array: bool,
    #[serde(default)]
    object_keys: Option<TypeConfigurationObject>,
}

impl From<StoredValueType> for ValueTypeConfiguration {
    fn from(stored: StoredValueType) -> Self {
        let kind = stored.kind.unwrap_or_else(|| {
            if stored.object_keys.is_some() {
                TypeKind::Object
            } else {
                TypeKind::from_default_label(&stored.label).unwrap_or(TypeKind::Unknown)
            }
        });
        Self {
            kind,
            label: stored.label,
            optional: stored.optional,
            is_array: stored.is_array,
            object_keys: stored.object_keys,
        }
    }
}

/// Equality as rendered: labels, markers and nested keys, ignoring `kind`
/// and key order.
pub fn same_shape(a: &TypeConfigurationObject, b: &TypeConfigurationObject) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, field)| {
            b.get(key).is_some_and(|other| same_field(field, other))
        })
}

fn same_field(a: &ValueTypeConfiguration, b: &ValueTypeConfiguration) -> bool {
    a.label == b.label
        && a.optional == b.optional
        && a.is_array == b.is_array
        && match (&a.object_keys, &b.object_keys) {
            (Some(a), Some(b)) => same_shape(a, b),
            (None, None) => true,
            _ => false,
        }
}

impl ValueTypeConfiguration {
    /// The nested shape to synthesize a declaration for, if any.
    ///
    /// A node labelled as an object but missing its keys renders as a plain field.
    pub fn nested_shape(&self) -> Option<&TypeConfigurationObject> {
        match (self.kind, &self.object_keys) {
            (TypeKind::Object, Some(keys)) if !keys.is_empty() => Some(keys),
            _ => None,
        }
    }
}

/// One synthesized declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfig {
    pub name: String,
    pub shape: TypeConfigurationObject,
    pub rendered_text: String,
}

/// Append-only, insertion-ordered declarations, unique by shape.
///
/// Lookup by shape is a linear scan, so filling a store of `n` declarations
/// costs O(n²) comparisons. Payload-sized inputs stay far below where that matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationStore {
    entries: Vec<InterfaceConfig>,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InterfaceConfig> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InterfaceConfig> {
        self.entries.iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&InterfaceConfig> {
        self.entries.iter().find(|decl| decl.name == name)
    }

    /// First declaration whose shape renders the same as `shape`.
    pub fn position(&self, shape: &TypeConfigurationObject) -> Option<usize> {
        self.entries.iter().position(|decl| same_shape(&decl.shape, shape))
    }

    pub(crate) fn push(&mut self, decl: InterfaceConfig) -> usize {
        self.entries.push(decl);
        self.entries.len() - 1
    }

    /// All declaration texts separated by a blank line, with a trailing newline.
    pub fn render_text(&self) -> String {
        let mut out = self.entries
            .iter()
            .map(|decl| decl.rendered_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }

    pub fn into_vec(self) -> Vec<InterfaceConfig> {
        self.entries
    }
}

impl From<Vec<InterfaceConfig>> for DeclarationStore {
    fn from(entries: Vec<InterfaceConfig>) -> Self {
        Self { entries }
    }
}

impl Index<usize> for DeclarationStore {
    type Output = InterfaceConfig;

    fn index(&self, index: usize) -> &InterfaceConfig {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a DeclarationStore {
    type Item = &'a InterfaceConfig;
    type IntoIter = std::slice::Iter<'a, InterfaceConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: TypeKind) -> ValueTypeConfiguration {
        ValueTypeConfiguration {
            kind,
            label: kind.default_label().to_string(),
            optional: false,
            is_array: false,
            object_keys: None,
        }
    }

    fn decl(name: &str, shape: TypeConfigurationObject) -> InterfaceConfig {
        let rendered_text = format!("export interface {name} {{\n}}");
        InterfaceConfig { name: name.into(), shape, rendered_text }
    }

    #[test]
    fn shape_lookup_is_deep_and_key_order_insensitive() {
        let mut inner = TypeConfigurationObject::new();
        inner.insert("d".into(), field(TypeKind::String));
        let mut outer = TypeConfigurationObject::new();
        outer.insert("a".into(), field(TypeKind::Number));
        outer.insert("c".into(), ValueTypeConfiguration {
            object_keys: Some(inner.clone()),
            ..field(TypeKind::Object)
        });

        let mut reordered = TypeConfigurationObject::new();
        reordered.insert("c".into(), outer["c"].clone());
        reordered.insert("a".into(), outer["a"].clone());

        let store = DeclarationStore::from(vec![decl("C", inner.clone()), decl("Response", outer)]);
        assert_eq!(store.position(&inner), Some(0));
        assert_eq!(store.position(&reordered), Some(1));

        let mut changed = inner;
        changed["d"].optional = true;
        assert_eq!(store.position(&changed), None);
    }

    #[test]
    fn nested_shape_requires_object_kind_and_keys() {
        let mut keys = TypeConfigurationObject::new();
        keys.insert("x".into(), field(TypeKind::Boolean));

        let plain = field(TypeKind::Object);
        assert!(plain.nested_shape().is_none());

        let nested = ValueTypeConfiguration { object_keys: Some(keys.clone()), ..field(TypeKind::Object) };
        assert_eq!(nested.nested_shape(), Some(&keys));

        let mislabelled = ValueTypeConfiguration { object_keys: Some(keys), ..field(TypeKind::String) };
        assert!(mislabelled.nested_shape().is_none());
    }

    #[test]
    fn render_text_joins_with_blank_lines() {
        let store = DeclarationStore::from(vec![
            decl("A", TypeConfigurationObject::new()),
            decl("B", TypeConfigurationObject::new()),
        ]);
        assert_eq!(store.render_text(), "export interface A {\n}\n\nexport interface B {\n}\n");
        assert_eq!(DeclarationStore::new().render_text(), "\n");
    }

    #[test]
    fn serializes_with_source_field_names() {
        let node = ValueTypeConfiguration { is_array: true, ..field(TypeKind::Number) };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({
            "kind": "number",
            "type": "number",
            "optional": false,
            "isArray": true
        }));
    }

    #[test]
    fn shape_lookup_ignores_kind_behind_a_shared_label() {
        let scalar = |kind| ValueTypeConfiguration { label: "Scalar".into(), ..field(kind) };
        let mut text = TypeConfigurationObject::new();
        text.insert("v".into(), scalar(TypeKind::String));
        let mut numeric = TypeConfigurationObject::new();
        numeric.insert("v".into(), scalar(TypeKind::Number));

        let store = DeclarationStore::from(vec![decl("Home", text)]);
        assert_eq!(store.position(&numeric), Some(0));

        numeric["v"].label = "number".into();
        assert_eq!(store.position(&numeric), None);
    }

    #[test]
    fn store_without_kinds_recovers_them() {
        let store: DeclarationStore = serde_json::from_value(serde_json::json!([{
            "name": "Response",
            "shape": {
                "id": {"type": "number", "optional": false, "isArray": false},
                "tag": {"type": "Tag", "optional": true, "isArray": true},
                "c": {
                    "type": "object",
                    "optional": false,
                    "isArray": false,
                    "objectKeys": {"d": {"type": "string", "optional": false, "isArray": false}}
                }
            },
            "renderedText": "export interface Response {\n}"
        }]))
        .unwrap();

        let shape = &store[0].shape;
        assert_eq!(shape["id"].kind, TypeKind::Number);
        assert_eq!(shape["tag"].kind, TypeKind::Unknown);
        assert!(shape["tag"].optional && shape["tag"].is_array);
        assert_eq!(shape["c"].kind, TypeKind::Object);
        assert_eq!(shape["c"].object_keys.as_ref().unwrap()["d"].kind, TypeKind::String);
        assert!(shape["c"].nested_shape().is_some());
    }
}
