//! Infer structural types from a sample JSON payload and render them as
//! named, de-duplicated TypeScript declarations.
//!
//! ```
//! use json_typedecl::{build_text, BuildOptions};
//!
//! let sample = serde_json::json!({"id": 1, "owner": {"name": "ada"}});
//! let text = build_text(&sample, &BuildOptions::default()).unwrap();
//! assert!(text.contains("export interface Owner {\n  name: string\n}"));
//! assert!(text.contains("  owner: Owner\n"));
//! ```
pub mod build;
pub mod cli;
pub mod declarations;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod options;
pub mod path_de;
pub mod writer;

pub use build::{build, build_into_store, build_text, BuildOutput};
pub use declarations::{Context, Synthesizer};
pub use error::{Error, Result};
pub use inference::{infer, infer_shape, Kind, Sample};
pub use ir::{
    same_shape, DeclarationStore, InterfaceConfig, TypeConfigurationObject, TypeKind,
    ValueTypeConfiguration,
};
pub use options::{BuildOptions, CustomTypes, NameCollision, RenderMode};
