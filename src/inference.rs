//! Structural type inference over a single sample value.
//!
//! One pass, leaf-first: every value is classified once into a closed set of
//! kinds, and each object level becomes a `TypeConfigurationObject` whose
//! fields are inferred independently of their siblings.
//!
//! Policy:
//! - Primitives are required unless force-optional is on.
//! - Null is always optional, whatever the force-optional setting says.
//! - Arrays take the type of their first element; an empty array is an
//!   optional `unknown[]`. No attempt is made to reconcile other elements.
//! - Custom labels only rename; classification never looks at labels.
pub mod arr;
pub mod obj;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ir::{TypeConfigurationObject, TypeKind, ValueTypeConfiguration};
use crate::options::BuildOptions;

// ------------------------------- Classify --------------------------------- //

/// kind enum + detector
#[derive(Debug)]
pub enum Kind<'a, V: ?Sized> {
    Text,
    Numeric,
    Boolean,
    Absent,
    /// Ordered container; only the first element is ever inspected.
    Sequence(Option<&'a V>),
    /// Keyed container, entries in insertion order.
    Keyed(Vec<(&'a str, &'a V)>),
    /// Anything JSON has no word for.
    Other,
}

impl<V: ?Sized> Kind<'_, V> {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Numeric => "numeric",
            Kind::Boolean => "boolean",
            Kind::Absent => "absent",
            Kind::Sequence(_) => "sequence",
            Kind::Keyed(_) => "keyed object",
            Kind::Other => "other",
        }
    }
}

/// A value that can be inferred from.
///
/// `serde_json::Value` is the usual input. Other value graphs can implement
/// this; those that can reach themselves must keep `identity` stable per
/// container so cycles are caught instead of recursed into.
pub trait Sample {
    fn classify(&self) -> Kind<'_, Self>;

    fn identity(&self) -> *const () {
        std::ptr::from_ref(self).cast()
    }
}

impl Sample for Value {
    fn classify(&self) -> Kind<'_, Self> {
        match self {
            Value::String(_) => Kind::Text,
            Value::Number(_) => Kind::Numeric,
            Value::Bool(_) => Kind::Boolean,
            Value::Null => Kind::Absent,
            Value::Array(xs) => Kind::Sequence(xs.first()),
            Value::Object(m) => Kind::Keyed(m.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        }
    }
}

// ------------------------------ Front API -------------------------------- //

/// Infer the type of one value.
pub fn infer<V: Sample + ?Sized>(value: &V, options: &BuildOptions) -> Result<ValueTypeConfiguration> {
    Inference::new(options).observe_value(value)
}

/// Infer the field mapping of a keyed root value.
pub fn infer_shape<V: Sample + ?Sized>(value: &V, options: &BuildOptions) -> Result<TypeConfigurationObject> {
    let mut inf = Inference::new(options);
    match value.classify() {
        Kind::Keyed(entries) => inf.enter(value.identity(), |inf| obj::observe_fields(inf, entries)),
        other => Err(Error::RootNotKeyed { kind: other.name() }),
    }
}

/// Walk state: the options, plus the containers and keys on the current path.
pub struct Inference<'o> {
    options: &'o BuildOptions,
    ancestors: Vec<*const ()>,
    path: Vec<String>,
}

impl<'o> Inference<'o> {
    pub fn new(options: &'o BuildOptions) -> Self {
        Self { options, ancestors: Vec::new(), path: Vec::new() }
    }

    pub fn observe_value<V: Sample + ?Sized>(&mut self, v: &V) -> Result<ValueTypeConfiguration> {
        match v.classify() {
            Kind::Text => Ok(self.leaf(TypeKind::String)),
            Kind::Numeric => Ok(self.leaf(TypeKind::Number)),
            Kind::Boolean => Ok(self.leaf(TypeKind::Boolean)),
            Kind::Absent => Ok(ValueTypeConfiguration {
                optional: true,
                ..self.leaf(TypeKind::Unknown)
            }),
            Kind::Sequence(first) => self.enter(v.identity(), |inf| arr::observe_sequence(inf, first)),
            Kind::Keyed(entries) => self.enter(v.identity(), |inf| obj::observe_object(inf, entries)),
            Kind::Other => Ok(self.leaf(TypeKind::Unknown)),
        }
    }

    /// Node for `kind` with the configured label and default optionality.
    fn leaf(&self, kind: TypeKind) -> ValueTypeConfiguration {
        ValueTypeConfiguration {
            kind,
            label: self.options.custom_types.label(kind).to_string(),
            optional: self.options.force_optional,
            is_array: false,
            object_keys: None,
        }
    }

    fn enter<T>(&mut self, id: *const (), f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.ancestors.contains(&id) {
            return Err(Error::CycleDetected { path: self.pointer() });
        }
        self.ancestors.push(id);
        let out = f(self);
        self.ancestors.pop();
        out
    }

    fn descend<T>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(segment.to_owned());
        let out = f(self);
        self.path.pop();
        out
    }

    /// JSON Pointer of the value currently being inferred.
    fn pointer(&self) -> String {
        if self.path.is_empty() {
            return "/".to_string();
        }
        self.path
            .iter()
            .map(|seg| format!("/{}", seg.replace('~', "~0").replace('/', "~1")))
            .collect()
    }
}

// ------------------------------- Tests ------------------------------------ //
