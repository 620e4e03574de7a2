use std::path::PathBuf;
use thiserror::Error;

/// Every way a compiler run can fail.
///
/// Row numbers are spreadsheet row numbers: the header is row 1 and the first
/// data row is row 2.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read tabular source {name}: {message}")]
    Source { name: String, message: String },

    #[error("header row: missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("row {row}: missing required value in column `{column}`")]
    MissingCell { row: usize, column: &'static str },

    #[error("row {row}: unrecognized cardinality `{token}`")]
    UnknownCardinality { row: usize, token: String },

    #[error("row {row}: unrecognized field kind `{value}` (expected `datatype` or `object`)")]
    UnknownFieldKind { row: usize, value: String },

    #[error("row {row}: `{value}` is not a valid local name")]
    InvalidLocalName { row: usize, value: String },

    #[error("row {row}: `{value}` uses an undeclared prefix")]
    UnknownPrefix { row: usize, value: String },

    #[error("row {row}: `{value}` is not a valid IRI")]
    InvalidIri { row: usize, value: String },

    #[error("row {row}: field `{field}` appears twice in class `{class}` (first on row {first_row})")]
    DuplicateField {
        row: usize,
        class: String,
        field: String,
        first_row: usize,
    },

    #[error("row {row}: class `{class}` resolves to <{iri}> but row {first_row} resolved it to <{first_iri}>")]
    ConflictingClass {
        row: usize,
        class: String,
        iri: String,
        first_row: usize,
        first_iri: String,
    },

    #[error("row {row}: field `{field}` of class `{class}` has unresolved range `{range}`")]
    UnresolvedRange {
        row: usize,
        field: String,
        class: String,
        range: String,
    },

    #[error("row {row}: local property <{property}> conflicts with its declaration on row {first_row}")]
    ConflictingProperty {
        row: usize,
        property: String,
        first_row: usize,
    },

    #[error("generated {document} failed self-check: {message}")]
    Verify {
        document: &'static str,
        message: String,
    },
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProfileError::Io {
            path: path.into(),
            source,
        }
    }

    /// The spreadsheet row the error points at, when it is row-specific.
    pub fn row(&self) -> Option<usize> {
        match self {
            ProfileError::MissingCell { row, .. }
            | ProfileError::UnknownCardinality { row, .. }
            | ProfileError::UnknownFieldKind { row, .. }
            | ProfileError::InvalidLocalName { row, .. }
            | ProfileError::UnknownPrefix { row, .. }
            | ProfileError::InvalidIri { row, .. }
            | ProfileError::DuplicateField { row, .. }
            | ProfileError::ConflictingClass { row, .. }
            | ProfileError::UnresolvedRange { row, .. }
            | ProfileError::ConflictingProperty { row, .. } => Some(*row),
            ProfileError::MissingColumn { .. } => Some(1),
            _ => None,
        }
    }
}
