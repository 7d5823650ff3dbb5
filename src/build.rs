//! Build entry points: sample value + options → declarations.

use std::path::Path;

use tracing::{error, info};

use crate::declarations::{Context, Synthesizer};
use crate::error::Result;
use crate::inference::{infer_shape, Sample};
use crate::ir::DeclarationStore;
use crate::options::BuildOptions;
use crate::writer::write_declarations;

#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutput {
    /// Every declaration of the build, in file order.
    Declarations(DeclarationStore),
    /// The rendered declaration file.
    Text(String),
}

impl BuildOutput {
    pub fn into_text(self) -> String {
        match self {
            BuildOutput::Declarations(store) => store.render_text(),
            BuildOutput::Text(text) => text,
        }
    }
}

/// Infer `value` and synthesize its declarations into `store`.
///
/// Returns the name of the root declaration, which is an existing one when
/// the store already holds the root shape. `options.use_store` is ignored
/// here; the caller owns the store.
pub fn build_into_store<V: Sample + ?Sized>(
    value: &V,
    options: &BuildOptions,
    store: &mut DeclarationStore,
) -> Result<String> {
    let shape = infer_shape(value, options)?;
    let ctx = Context::root(options.root_name(), options.render_mode());
    let root = Synthesizer::new(store, options.name_collision)
        .synthesize(&shape, &ctx)
        .name
        .clone();
    Ok(root)
}

/// Full build.
///
/// Starts from a copy of `options.use_store` (or an empty store). With
/// `return_configurations` the store itself is returned; otherwise the text
/// is returned, after being written to `options.output_location()` unless
/// writing is switched off. A failed write is logged, never returned.
pub fn build<V: Sample + ?Sized>(value: &V, options: &BuildOptions) -> Result<BuildOutput> {
    let mut store = options.use_store.clone().unwrap_or_default();
    build_into_store(value, options, &mut store)?;

    if options.return_configurations {
        return Ok(BuildOutput::Declarations(store));
    }

    let text = store.render_text();
    if options.writes_file() {
        deliver(&options.output_location(), &text, options.log_success);
    }
    Ok(BuildOutput::Text(text))
}

/// Rendered declaration text, without touching the filesystem.
pub fn build_text<V: Sample + ?Sized>(value: &V, options: &BuildOptions) -> Result<String> {
    let mut store = options.use_store.clone().unwrap_or_default();
    build_into_store(value, options, &mut store)?;
    Ok(store.render_text())
}

fn deliver(path: &Path, text: &str, log_success: bool) {
    match write_declarations(path, text) {
        Ok(()) if log_success => info!(path = %path.display(), "declarations written"),
        Ok(()) => {}
        Err(err) => error!(path = %path.display(), %err, "could not write declarations"),
    }
}

// ------------------------------- Tests ------------------------------------ //
