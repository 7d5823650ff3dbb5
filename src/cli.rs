//! Minimal CLI: infer → (shape | declarations)
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use crate::build::build_into_store;
use crate::error::Error;
use crate::inference::infer_shape;
use crate::ir::{DeclarationStore, TypeKind};
use crate::options::{BuildOptions, NameCollision};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer structure from sample JSON and emit TypeScript declarations (or the inferred shape)
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log what the synthesizer does (reuse, suffixing) to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the type-configuration tree as JSON
    Shape(ShapeOut),
    /// infer and emit de-duplicated TypeScript declarations
    Types(TypesOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InferenceSettings {
    /// options file (JSON, same keys as the library options); flags below override it
    #[arg(long = "options")]
    options_file: Option<PathBuf>,

    /// mark every field optional
    #[arg(long)]
    force_optional: bool,

    /// label used for strings
    #[arg(long)]
    string_type: Option<String>,

    /// label used for numbers
    #[arg(long)]
    number_type: Option<String>,

    /// label used for booleans
    #[arg(long)]
    boolean_type: Option<String>,

    /// label used for objects without keys
    #[arg(long)]
    object_type: Option<String>,

    /// label used for nulls and empty arrays
    #[arg(long)]
    unknown_type: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct ShapeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference: InferenceSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    inference: InferenceSettings,

    /// name of the root declaration
    #[arg(long)]
    root_type: Option<String>,

    /// emit `export type X = {` instead of `export interface X {`
    #[arg(long)]
    use_types: bool,

    /// end every field line with `;`
    #[arg(long)]
    semis: bool,

    /// keep colliding declaration names instead of suffixing them
    #[arg(long)]
    preserve_collisions: bool,

    /// output .d.ts file (defaults to the options' output location)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// print to stdout instead of writing a file
    #[arg(long, conflicts_with = "out")]
    stdout: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(&str, Value) -> anyhow::Result<()>) -> anyhow::Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;

            let parsed = if self.ndjson {
                source
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| serde_json::from_str::<Value>(line))
                    .collect::<Result<Vec<_>, _>>()
            } else {
                serde_json::from_str::<Value>(&source).map(|v| vec![v])
            };
            let documents = parsed
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;

            for document in documents {
                for selected in self.select(document)? {
                    apply(&source_path_str, selected)
                        .with_context(|| format!("failed to infer types for ({source_path_str})"))?;
                }
            }
        }
        Ok(())
    }

    fn select(&self, document: Value) -> anyhow::Result<Vec<Value>> {
        let document = match self.json_pointer.as_deref() {
            None => document,
            Some(pointer) => document
                .pointer(pointer)
                .cloned()
                .with_context(|| format!("JSON pointer {pointer} matched nothing"))?,
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![document]),
            Some(jq_expr) => Ok(crate::jq_exec::select_documents(jq_expr, &document)?),
        }
    }
}

impl InferenceSettings {
    fn options(&self) -> anyhow::Result<BuildOptions> {
        let mut options = match self.options_file.as_deref() {
            Some(path) => BuildOptions::from_json_file(path)?,
            None => BuildOptions::default(),
        };
        if self.force_optional {
            options.force_optional = true;
        }
        for (kind, label) in [
            (TypeKind::String, &self.string_type),
            (TypeKind::Number, &self.number_type),
            (TypeKind::Boolean, &self.boolean_type),
            (TypeKind::Object, &self.object_type),
            (TypeKind::Unknown, &self.unknown_type),
        ] {
            if let Some(label) = label {
                options.custom_types.set(kind, label.clone());
            }
        }
        Ok(options)
    }
}

impl TypesOut {
    fn options(&self) -> anyhow::Result<BuildOptions> {
        let mut options = self.inference.options()?;
        if let Some(name) = &self.root_type {
            options.initial_interface_name = Some(name.clone());
        }
        options.use_type_alias |= self.use_types;
        options.render_statement_terminators |= self.semis;
        if self.preserve_collisions {
            options.name_collision = NameCollision::Preserve;
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Shape(target) => {
                let options = target.inference.options()?;
                let mut shapes = Vec::new();
                target.input_settings.load_process(|_, value| {
                    shapes.push(infer_shape(&value, &options)?);
                    Ok(())
                })?;

                let shape_src = if shapes.len() == 1 {
                    serde_json::to_string_pretty(&shapes[0])?
                } else {
                    serde_json::to_string_pretty(&shapes)?
                };
                match target.out.as_ref() {
                    Some(out) => crate::writer::write_declarations(out, &shape_src)?,
                    None => println!("{shape_src}"),
                }
            }
            Command::Types(target) => {
                let options = target.options()?;

                // one store across every document so shared shapes are declared once
                let mut store = options.use_store.clone().unwrap_or_default();
                target.input_settings.load_process(|source, value| {
                    let root = build_into_store(&value, &options, &mut store)?;
                    debug!(%source, %root, "document built");
                    Ok(())
                })?;
                let text = store.render_text();

                if target.stdout {
                    print!("{text}");
                    return Ok(());
                }
                let out = target.out.clone().unwrap_or_else(|| options.output_location());
                crate::writer::write_declarations(&out, &text)?;
                report(&store, &out);
            }
        }
        Ok(())
    }
}

fn report(store: &DeclarationStore, out: &std::path::Path) {
    let noun = if store.len() == 1 { "declaration" } else { "declarations" };
    eprintln!(
        "{} {} {noun} → {}",
        "✓".green().bold(),
        store.len(),
        out.display().to_string().bold(),
    );
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| Error::Glob(format!("{pattern}: {e}")))?;
        let before = out.len();
        for entry in entries {
            out.push(entry.map_err(|e| Error::Glob(e.to_string()))?);
        }
        if out.len() == before {
            // an explicit glob that matched nothing is almost always a typo
            return Err(Error::Glob(format!("pattern matched no files: {pattern}")));
        }
    }

    Ok(out)
}
