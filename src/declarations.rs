//! Declaration synthesis: type-configuration tree → named, de-duplicated declarations.
//!
//! Walks a shape top-down. Each object-typed field with keys becomes its own
//! declaration, named after the chain of field names leading to it, unless a
//! structurally equal shape already sits in the store, in which case that
//! declaration's name is reused and nothing is emitted.
//!
//! Nested declarations are appended before the declaration that references
//! them, so the root comes last.

use std::collections::HashSet;

use tracing::debug;

use crate::ir::{DeclarationStore, InterfaceConfig, TypeConfigurationObject, ValueTypeConfiguration};
use crate::options::{defaults, NameCollision, RenderMode};

// ------------------------------- Context ---------------------------------- //

/// Per-call naming and rendering state, threaded down the recursion.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// Name for this shape's declaration; `None` falls back to the default.
    pub name: Option<String>,
    /// Field names from the root to this shape.
    pub chain: Vec<String>,
    pub mode: RenderMode,
}

impl Context {
    pub fn root(name: impl Into<String>, mode: RenderMode) -> Self {
        Self { name: Some(name.into()), chain: Vec::new(), mode }
    }

    /// Context for the object under field `key`.
    fn child(&self, key: &str) -> Self {
        let mut chain = self.chain.clone();
        chain.push(key.to_owned());
        Self { name: Some(derived_name(&chain)), chain, mode: self.mode }
    }
}

// ----------------------------- Synthesizer -------------------------------- //

pub struct Synthesizer<'s> {
    store: &'s mut DeclarationStore,
    collisions: NameCollision,
    /// Names in the store plus names claimed by declarations still being rendered.
    used_names: HashSet<String>,
}

impl<'s> Synthesizer<'s> {
    pub fn new(store: &'s mut DeclarationStore, collisions: NameCollision) -> Self {
        let used_names = store.iter().map(|decl| decl.name.clone()).collect();
        Self { store, collisions, used_names }
    }

    /// Declaration for `shape`: an existing one if the store has an equal
    /// shape, otherwise a freshly rendered one appended to the store.
    pub fn synthesize(&mut self, shape: &TypeConfigurationObject, ctx: &Context) -> &InterfaceConfig {
        let index = self.resolve(shape, ctx);
        &self.store[index]
    }

    fn resolve(&mut self, shape: &TypeConfigurationObject, ctx: &Context) -> usize {
        if let Some(index) = self.store.position(shape) {
            debug!(name = %self.store[index].name, "reusing declaration");
            return index;
        }

        // a blank name (e.g. from an empty key) cannot head a declaration
        let candidate = ctx.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults::DEFAULT_INTERFACE_NAME);
        let name = self.claim_name(candidate);

        let mut text = header(&name, ctx.mode);
        for (key, field) in shape {
            let label = match field.nested_shape() {
                Some(nested) => {
                    let index = self.resolve(nested, &ctx.child(key));
                    self.store[index].name.clone()
                }
                None => field.label.clone(),
            };
            text.push_str(&field_line(key, &label, field, ctx.mode));
        }
        text.push('}');

        debug!(%name, fields = shape.len(), "emitting declaration");
        self.store.push(InterfaceConfig {
            name,
            shape: shape.clone(),
            rendered_text: text,
        })
    }

    fn claim_name(&mut self, candidate: &str) -> String {
        if self.collisions == NameCollision::Preserve || self.used_names.insert(candidate.to_owned()) {
            return candidate.to_owned();
        }
        let mut counter = 2;
        loop {
            let name = format!("{candidate}{counter}");
            if self.used_names.insert(name.clone()) {
                debug!(%candidate, %name, "declaration name taken, using suffix");
                return name;
            }
            counter += 1;
        }
    }
}

// ------------------------------- Rendering -------------------------------- //

fn header(name: &str, mode: RenderMode) -> String {
    if mode.type_alias {
        format!("export type {name} = {{\n")
    } else {
        format!("export interface {name} {{\n")
    }
}

/// `  key?: label[];` with each marker only when it applies.
fn field_line(key: &str, label: &str, field: &ValueTypeConfiguration, mode: RenderMode) -> String {
    format!(
        "  {key}{}: {label}{}{}\n",
        if field.optional { "?" } else { "" },
        if field.is_array { "[]" } else { "" },
        if mode.terminators { ";" } else { "" },
    )
}

// -------------------------------- Naming ---------------------------------- //

/// Uppercase the first character of every space-separated word.
pub fn capitalize(segment: &str) -> String {
    segment
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `["user", "home address"]` → `"UserHome Address"`.
pub fn derived_name(chain: &[String]) -> String {
    chain.iter().map(|segment| capitalize(segment)).collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer_shape;
    use crate::options::BuildOptions;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn synthesize_all(value: &Value, opts: &BuildOptions) -> DeclarationStore {
        let shape = infer_shape(value, opts).unwrap();
        let mut store = DeclarationStore::new();
        let ctx = Context::root(opts.root_name(), opts.render_mode());
        Synthesizer::new(&mut store, opts.name_collision).synthesize(&shape, &ctx);
        store
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize("address"), "Address");
        assert_eq!(capitalize("home address"), "Home Address");
        assert_eq!(capitalize("already Upper"), "Already Upper");
        assert_eq!(capitalize("double  space"), "Double  Space");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn derived_names_concatenate_the_chain() {
        let chain = vec!["user".to_string(), "home address".to_string()];
        assert_eq!(derived_name(&chain), "UserHome Address");
        assert_eq!(derived_name(&[]), "");
    }

    #[test]
    fn renders_nested_first_and_root_last() {
        let store = synthesize_all(&json!({"a": 1, "b": true, "c": {"d": "three"}}), &BuildOptions::default());
        assert_eq!(store.len(), 2);
        assert_eq!(store[0].rendered_text, "export interface C {\n  d: string\n}");
        assert_eq!(
            store[1].rendered_text,
            "export interface Response {\n  a: number\n  b: boolean\n  c: C\n}"
        );
    }

    #[test]
    fn markers_and_terminators() {
        let opts = BuildOptions::new().with_statement_terminators(true).with_type_alias(true);
        let store = synthesize_all(
            &json!({"tags": ["x"], "gone": null, "rows": [{"id": 1}], "none": []}),
            &opts,
        );
        assert_eq!(store[0].rendered_text, "export type Rows = {\n  id: number;\n}");
        assert_eq!(
            store[1].rendered_text,
            "export type Response = {\n  tags: string[];\n  gone?: unknown;\n  rows: Rows[];\n  none?: unknown[];\n}"
        );
    }

    #[test]
    fn chain_names_deeply_nested_shapes() {
        let store = synthesize_all(
            &json!({"user": {"profile": {"home address": {"city": "Oslo"}}}}),
            &BuildOptions::default(),
        );
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["UserProfileHome Address", "UserProfile", "User", "Response"]);
    }

    #[test]
    fn identical_siblings_share_one_declaration() {
        let store = synthesize_all(
            &json!({"home": {"street": "a", "zip": 1}, "work": {"street": "b", "zip": 2}}),
            &BuildOptions::default(),
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store[0].name, "Home");
        assert_eq!(
            store[1].rendered_text,
            "export interface Response {\n  home: Home\n  work: Home\n}"
        );
    }

    #[test]
    fn same_shape_twice_appends_once() {
        let opts = BuildOptions::default();
        let shape = infer_shape(&json!({"x": 1}), &opts).unwrap();
        let mut store = DeclarationStore::new();
        let mut synth = Synthesizer::new(&mut store, NameCollision::Disambiguate);

        let first = synth.synthesize(&shape, &Context::root("First", RenderMode::default())).clone();
        let second = synth.synthesize(&shape, &Context::root("Second", RenderMode::default())).clone();
        assert_eq!(first, second);
        assert_eq!(second.name, "First");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn differing_shapes_get_distinct_entries() {
        let opts = BuildOptions::default();
        let mut store = DeclarationStore::new();
        let mut synth = Synthesizer::new(&mut store, NameCollision::Disambiguate);
        for value in [json!({"x": 1}), json!({"x": "1"}), json!({"x": null}), json!({"x": [1]})] {
            let shape = infer_shape(&value, &opts).unwrap();
            synth.synthesize(&shape, &Context::root("T", RenderMode::default()));
        }
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let store = synthesize_all(
            &json!({"a": {"b": {"x": 1}}, "aB": {"y": true}}),
            &BuildOptions::default(),
        );
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["AB", "A", "AB2", "Response"]);
        assert!(store[3].rendered_text.contains("  aB: AB2\n"));
    }

    #[test]
    fn ancestors_reserve_their_names() {
        let opts = BuildOptions::new().with_initial_interface_name("Item");
        let store = synthesize_all(&json!({"item": {"n": 1}}), &opts);
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Item2", "Item"]);
    }

    #[test]
    fn preserve_policy_keeps_colliding_names() {
        let opts = BuildOptions::new().with_name_collision(NameCollision::Preserve);
        let store = synthesize_all(&json!({"a": {"b": {"x": 1}}, "aB": {"y": true}}), &opts);
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["AB", "A", "AB", "Response"]);
    }

    #[test]
    fn seeded_store_names_are_reserved_and_shapes_reused() {
        let opts = BuildOptions::default();
        let mut store = synthesize_all(&json!({"c": {"d": "x"}}), &opts);

        let shape = infer_shape(&json!({"c": {"d": "y"}, "e": 1}), &opts).unwrap();
        let ctx = Context::root(opts.root_name(), opts.render_mode());
        let root = Synthesizer::new(&mut store, opts.name_collision).synthesize(&shape, &ctx).clone();

        assert_eq!(root.name, "Response2");
        assert_eq!(store.len(), 3);
        assert!(root.rendered_text.contains("  c: C\n"));
    }

    #[test]
    fn unnamed_context_falls_back_to_default() {
        let shape = infer_shape(&json!({"x": 1}), &BuildOptions::default()).unwrap();
        let mut store = DeclarationStore::new();
        let decl = Synthesizer::new(&mut store, NameCollision::Disambiguate)
            .synthesize(&shape, &Context::default())
            .clone();
        assert_eq!(decl.name, "Response");
    }

    #[test]
    fn rendered_lines_lex_back_to_their_configuration() {
        let line_re = regex::Regex::new(r"^  ([^?:]+)(\?)?: (.+?)(\[\])?;?$").unwrap();
        let opts = BuildOptions::new().with_statement_terminators(true);
        let store = synthesize_all(
            &json!({"id": 7, "tags": ["a"], "gone": null, "rows": [{"n": 1}], "none": [], "ok": false}),
            &opts,
        );

        for decl in &store {
            let lines: Vec<_> = decl.rendered_text.lines().skip(1).filter(|l| *l != "}").collect();
            assert_eq!(lines.len(), decl.shape.len());
            for (line, (key, field)) in lines.iter().zip(&decl.shape) {
                let caps = line_re.captures(line).unwrap();
                assert_eq!(&caps[1], key.as_str());
                assert_eq!(caps.get(2).is_some(), field.optional, "{line}");
                assert_eq!(caps.get(4).is_some(), field.is_array, "{line}");
                let expected = match field.nested_shape() {
                    Some(nested) => store[store.position(nested).unwrap()].name.as_str(),
                    None => field.label.as_str(),
                };
                assert_eq!(&caps[3], expected);
            }
        }
    }

    #[test]
    fn object_field_without_keys_renders_its_label() {
        let opts = BuildOptions::new().with_custom_type(crate::ir::TypeKind::Object, "Record<string, never>");
        let store = synthesize_all(&json!({"meta": {}}), &opts);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store[0].rendered_text,
            "export interface Response {\n  meta: Record<string, never>\n}"
        );
    }

    #[test]
    fn blank_keys_fall_back_to_the_default_name() {
        let store = synthesize_all(&json!({"": {"a": 1}, " ": {"b": true}}), &BuildOptions::default());
        let names: Vec<_> = store.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Response2", "Response3", "Response"]);
        assert_eq!(store[0].rendered_text, "export interface Response2 {\n  a: number\n}");
        assert_eq!(
            store[2].rendered_text,
            "export interface Response {\n  : Response2\n   : Response3\n}"
        );
    }

    #[test]
    fn blank_root_name_falls_back_to_the_default() {
        let opts = BuildOptions::new().with_initial_interface_name("");
        let store = synthesize_all(&json!({"x": 1}), &opts);
        assert_eq!(store[0].name, "Response");
    }

    #[test]
    fn hundred_levels_of_nesting() {
        const DEPTH: usize = 100;
        let mut value = json!({"x": 1});
        for _ in 0..DEPTH {
            value = json!({"n": value});
        }

        let store = synthesize_all(&value, &BuildOptions::default());
        assert_eq!(store.len(), DEPTH + 1);
        assert_eq!(store[0].name, "N".repeat(DEPTH));
        assert_eq!(store[0].rendered_text, format!("export interface {} {{\n  x: number\n}}", "N".repeat(DEPTH)));
        for (index, decl) in store.iter().take(DEPTH).enumerate() {
            assert_eq!(decl.name, "N".repeat(DEPTH - index));
        }
        assert_eq!(store[DEPTH].rendered_text, "export interface Response {\n  n: N\n}");
    }
}
