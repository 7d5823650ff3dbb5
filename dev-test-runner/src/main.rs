//! End-to-end smoke run: realistic payloads through the whole pipeline.
//!
//! Each case builds declarations and checks them against what the payload
//! implies: expected declaration count, and that every rendered field line
//! lexes back to the type configuration it came from.

use json_typedecl::{build, BuildOptions, BuildOutput, DeclarationStore, InterfaceConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^  (?P<key>[^?:]+)(?P<opt>\?)?: (?P<ty>.+?)(?P<arr>\[\])?;?$").unwrap()
});

const CASES: &str = r#"[
  {
    "name": "scenario-a",
    "payload": { "a": 1, "b": true, "c": { "d": "three" } },
    "declarations": 2
  },
  {
    "name": "shared-address",
    "options": { "useTypes": true, "renderSemis": true },
    "payload": {
      "billing": { "street": "1 Main St", "zip": "02139" },
      "shipping": { "street": "2 Side St", "zip": "94103" },
      "orders": [ { "id": 7, "items": [], "note": null } ]
    },
    "declarations": 3
  },
  {
    "name": "api-page",
    "options": { "initialInterfaceName": "Page", "forceOptional": true, "customTypes": { "unknown": "any" } },
    "payload": {
      "data": [ { "id": "u1", "profile": { "age": 30, "tags": ["a"] } } ],
      "meta": { "next": null, "total": 120 },
      "links": {}
    },
    "declarations": 4
  }
]"#;

#[derive(Deserialize)]
struct Case {
    name: String,
    #[serde(default)]
    options: BuildOptions,
    payload: serde_json::Value,
    declarations: usize,
}

fn main() {
    let de = &mut serde_json::Deserializer::from_str(CASES);
    let cases: Vec<Case> = match serde_path_to_error::deserialize(de) {
        Ok(cases) => cases,
        Err(err) => panic!("bad case manifest at {}: {}", err.path(), err.inner()),
    };

    let mut failures = 0;
    for case in cases {
        let options = case.options.clone().with_return_configurations(true);
        let store = match build(&case.payload, &options) {
            Ok(BuildOutput::Declarations(store)) => store,
            Ok(BuildOutput::Text(_)) => unreachable!("configurations were requested"),
            Err(error) => {
                eprintln!("❌ {}: {error}", case.name);
                failures += 1;
                continue;
            }
        };
        match check(&store, case.declarations) {
            Ok(()) => eprintln!("✅ {} ({} declarations)", case.name, store.len()),
            Err(problem) => {
                eprintln!("❌ {}: {problem}", case.name);
                failures += 1;
            }
        }
        println!("{}", store.render_text());
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

fn check(store: &DeclarationStore, expected: usize) -> Result<(), String> {
    if store.len() != expected {
        return Err(format!("expected {expected} declarations, got {}", store.len()));
    }
    store.iter().try_for_each(|decl| round_trip(store, decl))
}

/// Every field line must reproduce name, optionality, array-ness and type.
fn round_trip(store: &DeclarationStore, decl: &InterfaceConfig) -> Result<(), String> {
    let lines: Vec<_> = decl.rendered_text.lines().filter(|l| l.starts_with("  ")).collect();
    if lines.len() != decl.shape.len() {
        return Err(format!("{}: {} field lines for {} fields", decl.name, lines.len(), decl.shape.len()));
    }
    for (line, (key, field)) in lines.iter().zip(&decl.shape) {
        let caps = FIELD_LINE
            .captures(line)
            .ok_or_else(|| format!("{}: unparseable field line {line:?}", decl.name))?;
        let ty = &caps["ty"];
        let expected_ty = match field.nested_shape() {
            Some(nested) => store
                .position(nested)
                .map(|index| store[index].name.as_str())
                .ok_or_else(|| format!("{}.{key}: nested shape was never declared", decl.name))?,
            None => field.label.as_str(),
        };
        if &caps["key"] != key
            || caps.name("opt").is_some() != field.optional
            || caps.name("arr").is_some() != field.is_array
            || ty != expected_ty
        {
            return Err(format!("{}: {line:?} does not match {field:?}", decl.name));
        }
    }
    Ok(())
}
