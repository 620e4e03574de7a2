//! Compiles a tabular application profile into an OWL ontology extension and
//! a SHACL shapes graph.
//!
//! The table is the source of truth: one row per field, naming the class it
//! belongs to, its range, its cardinality and optionally an external property
//! to reuse. Both outputs are derived and regenerated in full on every run.
#![deny(clippy::all)]

pub mod canonicalization;
pub mod config;
pub mod diagram;
pub mod emit;
pub mod error;
pub mod model;
pub mod named_nodes;
pub mod output;
pub mod parser;
pub mod prefixes;
pub mod source;
pub mod verify;

pub use config::ProfileConfig;
pub use error::ProfileError;
pub use model::{Cardinality, Profile};
pub use output::{Artifacts, FileStatus};
pub use source::SourceTable;

use crate::emit::ontology::ontology_document;
use crate::emit::shapes::shapes_document;
use crate::emit::EmitContext;
use crate::prefixes::PrefixMap;
use log::info;
use std::path::Path;

/// A simple facade for the profile compiler.
///
/// Holds a validated configuration and its prefix bindings, and turns source
/// tables into [`Artifacts`]. Compilation is pure: nothing touches the
/// filesystem until [`Artifacts::write`] is called.
pub struct Compiler {
    config: ProfileConfig,
    prefixes: PrefixMap,
}

impl Compiler {
    /// Creates a compiler, validating the namespace settings of `config`.
    pub fn new(config: ProfileConfig) -> Result<Self, ProfileError> {
        let prefixes = config.prefix_map()?;
        Ok(Compiler { config, prefixes })
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Parses and resolves a table without rendering anything.
    pub fn parse(&self, table: &SourceTable) -> Result<Profile, ProfileError> {
        parser::parse_profile(table, &self.config, &self.prefixes)
    }

    /// Compiles a table into verified ontology and shapes documents.
    pub fn compile(&self, table: &SourceTable) -> Result<Artifacts, ProfileError> {
        let profile = self.parse(table)?;
        self.render(&profile, table)
    }

    /// Reads the table at `path` and compiles it.
    pub fn compile_file(&self, path: &Path) -> Result<Artifacts, ProfileError> {
        let table = SourceTable::from_path(path)?;
        self.compile(&table)
    }

    /// Renders an already parsed profile. `table` supplies the provenance
    /// written into the document headers.
    pub fn render(&self, profile: &Profile, table: &SourceTable) -> Result<Artifacts, ProfileError> {
        let ctx = EmitContext {
            config: &self.config,
            prefixes: &self.prefixes,
            source_name: table.name(),
            source_digest: table.digest(),
        };
        let artifacts = Artifacts {
            ontology: ontology_document(profile, &ctx),
            shapes: shapes_document(profile, &ctx),
        };
        verify::verify_documents(profile, &artifacts.ontology, &artifacts.shapes)?;
        info!(
            "Rendered {} node shapes and {} local declarations",
            profile.classes.len(),
            profile.local_classes().count() + profile.properties.len()
        );
        Ok(artifacts)
    }

    /// Generates a Graphviz DOT string representation of the profile.
    pub fn to_graphviz(&self, profile: &Profile) -> String {
        diagram::to_graphviz(profile, &self.prefixes)
    }
}
