//! Build configuration.
//!
//! Field names deserialize in camelCase, so an options file reads like the
//! option table (`forceOptional`, `initialInterfaceName`, ...). The older
//! spellings `useTypes`, `renderSemis` and `returnFileString` are accepted too.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ir::{DeclarationStore, TypeKind};

// ------------------------------- Defaults -------------------------------- //

pub mod defaults {
    /// Root declaration name when none is configured.
    pub const DEFAULT_INTERFACE_NAME: &str = "Response";
    pub const DEFAULT_OUTPUT_PATH: &str = "dist";
    pub const DEFAULT_OUTPUT_FILENAME: &str = "exported.d.ts";
}

// ------------------------------ Type labels ------------------------------- //

/// Replacement labels for the primitive kinds. Unset slots keep the default label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTypes {
    pub string: Option<String>,
    pub number: Option<String>,
    pub boolean: Option<String>,
    pub object: Option<String>,
    pub unknown: Option<String>,
}

impl CustomTypes {
    pub fn label(&self, kind: TypeKind) -> &str {
        let custom = match kind {
            TypeKind::String => &self.string,
            TypeKind::Number => &self.number,
            TypeKind::Boolean => &self.boolean,
            TypeKind::Object => &self.object,
            TypeKind::Unknown => &self.unknown,
        };
        custom.as_deref().unwrap_or(kind.default_label())
    }

    pub fn set(&mut self, kind: TypeKind, label: impl Into<String>) {
        let slot = match kind {
            TypeKind::String => &mut self.string,
            TypeKind::Number => &mut self.number,
            TypeKind::Boolean => &mut self.boolean,
            TypeKind::Object => &mut self.object,
            TypeKind::Unknown => &mut self.unknown,
        };
        *slot = Some(label.into());
    }
}

// ------------------------------ Name policy ------------------------------- //

/// What to do when a new shape derives a name that is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameCollision {
    /// Append the smallest free numeric suffix, starting at 2.
    #[default]
    Disambiguate,
    /// Reuse the taken name; the output then declares it twice.
    Preserve,
}

/// Declaration syntax flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderMode {
    /// `export type X = {` instead of `export interface X {`.
    pub type_alias: bool,
    /// `;` after every field line.
    pub terminators: bool,
}

// -------------------------------- Options --------------------------------- //

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    pub custom_types: CustomTypes,
    pub force_optional: bool,
    pub initial_interface_name: Option<String>,
    #[serde(alias = "useTypes")]
    pub use_type_alias: bool,
    #[serde(alias = "renderSemis")]
    pub render_statement_terminators: bool,
    /// Seed store; `build` works on a copy and leaves this one untouched.
    pub use_store: Option<DeclarationStore>,
    pub output_path: Option<PathBuf>,
    pub output_filename: Option<String>,
    pub skip_file_write: bool,
    #[serde(alias = "returnFileString")]
    pub return_text_only: bool,
    /// Return the declaration store instead of the rendered text.
    pub return_configurations: bool,
    pub log_success: bool,
    pub name_collision: NameCollision,
}

impl BuildOptions {
    pub fn new() -> Self { Self::default() }

    /// Load options from a JSON document, reporting the JSON path of bad values.
    pub fn from_json_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        crate::path_de::from_slice_with_path(&bytes)
    }

    #[must_use]
    pub fn with_custom_type(mut self, kind: TypeKind, label: impl Into<String>) -> Self {
        self.custom_types.set(kind, label);
        self
    }

    #[must_use]
    pub fn with_force_optional(mut self, value: bool) -> Self {
        self.force_optional = value;
        self
    }

    #[must_use]
    pub fn with_initial_interface_name(mut self, name: impl Into<String>) -> Self {
        self.initial_interface_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_type_alias(mut self, value: bool) -> Self {
        self.use_type_alias = value;
        self
    }

    #[must_use]
    pub fn with_statement_terminators(mut self, value: bool) -> Self {
        self.render_statement_terminators = value;
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: DeclarationStore) -> Self {
        self.use_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_skip_file_write(mut self, value: bool) -> Self {
        self.skip_file_write = value;
        self
    }

    #[must_use]
    pub fn with_return_text_only(mut self, value: bool) -> Self {
        self.return_text_only = value;
        self
    }

    #[must_use]
    pub fn with_return_configurations(mut self, value: bool) -> Self {
        self.return_configurations = value;
        self
    }

    #[must_use]
    pub fn with_log_success(mut self, value: bool) -> Self {
        self.log_success = value;
        self
    }

    #[must_use]
    pub fn with_name_collision(mut self, policy: NameCollision) -> Self {
        self.name_collision = policy;
        self
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode {
            type_alias: self.use_type_alias,
            terminators: self.render_statement_terminators,
        }
    }

    pub fn root_name(&self) -> &str {
        self.initial_interface_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(defaults::DEFAULT_INTERFACE_NAME)
    }

    /// Where the file-write step puts the declarations.
    pub fn output_location(&self) -> PathBuf {
        let dir = self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_OUTPUT_PATH));
        let file = self.output_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(defaults::DEFAULT_OUTPUT_FILENAME);
        dir.join(file)
    }

    /// Whether `build` hands the text to the file writer.
    pub fn writes_file(&self) -> bool {
        !self.skip_file_write && !self.return_text_only && !self.return_configurations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_once() {
        let opts = BuildOptions::default();
        assert_eq!(opts.root_name(), "Response");
        assert_eq!(opts.output_location(), Path::new("dist").join("exported.d.ts"));
        assert_eq!(opts.render_mode(), RenderMode::default());
        assert_eq!(opts.name_collision, NameCollision::Disambiguate);
        assert!(opts.writes_file());
    }

    #[test]
    fn custom_labels_fall_back_per_slot() {
        let opts = BuildOptions::new().with_custom_type(TypeKind::String, "Str");
        assert_eq!(opts.custom_types.label(TypeKind::String), "Str");
        assert_eq!(opts.custom_types.label(TypeKind::Number), "number");
        assert_eq!(opts.custom_types.label(TypeKind::Unknown), "unknown");
    }

    #[test]
    fn parses_camel_case_and_source_aliases() {
        let opts = BuildOptions::from_json_str(r#"{
            "customTypes": { "unknown": "any" },
            "forceOptional": true,
            "initialInterfaceName": "Runner",
            "useTypes": true,
            "renderSemis": true,
            "outputPath": "types",
            "outputFilename": "api.d.ts",
            "returnFileString": true,
            "nameCollision": "preserve"
        }"#).unwrap();

        assert!(opts.force_optional);
        assert_eq!(opts.root_name(), "Runner");
        assert_eq!(opts.render_mode(), RenderMode { type_alias: true, terminators: true });
        assert_eq!(opts.custom_types.label(TypeKind::Unknown), "any");
        assert_eq!(opts.output_location(), Path::new("types").join("api.d.ts"));
        assert_eq!(opts.name_collision, NameCollision::Preserve);
        assert!(!opts.writes_file());
    }

    #[test]
    fn bad_option_reports_json_path() {
        let err = BuildOptions::from_json_str(r#"{ "customTypes": { "string": 5 } }"#).unwrap_err();
        match err {
            Error::Options { path, .. } => assert_eq!(path, "customTypes.string"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
