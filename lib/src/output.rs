//! Writing the generated documents, and comparing them with what is on disk.
use crate::canonicalization::are_isomorphic;
use crate::error::ProfileError;
use crate::verify::parse_turtle;
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The two documents produced by one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub ontology: String,
    pub shapes: String,
}

/// How a file on disk relates to freshly generated output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Byte-identical.
    UpToDate,
    /// Same graph, different text (comments, layout, blank node labels).
    Reformatted,
    /// Different graph, or not parseable.
    Stale,
    Missing,
}

impl FileStatus {
    pub fn is_current(&self) -> bool {
        matches!(self, FileStatus::UpToDate | FileStatus::Reformatted)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileStatus::UpToDate => "up to date",
            FileStatus::Reformatted => "reformatted (same graph)",
            FileStatus::Stale => "stale",
            FileStatus::Missing => "missing",
        };
        write!(f, "{}", text)
    }
}

impl Artifacts {
    /// Replaces both files. Each document is first written to a temporary
    /// file beside its target; the targets are only touched once both
    /// temporaries are complete.
    ///
    /// The two renames are not one atomic step. If the shapes rename fails
    /// the previous ontology is put back (or the new one removed when there
    /// was none), so a failed run leaves the old pair in place unless that
    /// restore fails as well.
    pub fn write(&self, ontology_path: &Path, shapes_path: &Path) -> Result<(), ProfileError> {
        if ontology_path == shapes_path {
            return Err(ProfileError::Config(format!(
                "ontology and shapes would both be written to {}",
                ontology_path.display()
            )));
        }
        let ontology = stage(ontology_path, &self.ontology)?;
        let shapes = stage(shapes_path, &self.shapes)?;
        let previous = match fs::read(ontology_path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(ProfileError::io(ontology_path, e)),
        };
        ontology
            .persist(ontology_path)
            .map_err(|e| ProfileError::io(ontology_path, e.error))?;
        if let Err(e) = shapes.persist(shapes_path) {
            restore(ontology_path, previous.as_deref());
            return Err(ProfileError::io(shapes_path, e.error));
        }
        info!("Wrote {}", ontology_path.display());
        info!("Wrote {}", shapes_path.display());
        Ok(())
    }

    /// Compares both documents with the files at the given paths.
    pub fn compare(
        &self,
        ontology_path: &Path,
        shapes_path: &Path,
    ) -> Result<(FileStatus, FileStatus), ProfileError> {
        Ok((
            file_status(ontology_path, &self.ontology)?,
            file_status(shapes_path, &self.shapes)?,
        ))
    }
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, ProfileError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| ProfileError::io(dir, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| ProfileError::io(file.path(), e))?;
    debug!("Staged {} at {}", path.display(), file.path().display());
    Ok(file)
}

fn restore(path: &Path, previous: Option<&[u8]>) {
    let result = match previous {
        Some(bytes) => fs::write(path, bytes),
        None => fs::remove_file(path),
    };
    match result {
        Ok(()) => debug!("Restored {}", path.display()),
        Err(e) => warn!("Could not restore {}: {}", path.display(), e),
    }
}

fn file_status(path: &Path, expected: &str) -> Result<FileStatus, ProfileError> {
    let current = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileStatus::Missing),
        Err(e) => return Err(ProfileError::io(path, e)),
    };
    if current == expected {
        return Ok(FileStatus::UpToDate);
    }
    let status = match (parse_turtle(&current), parse_turtle(expected)) {
        (Ok(on_disk), Ok(generated)) if are_isomorphic(&on_disk, &generated) => {
            FileStatus::Reformatted
        }
        _ => FileStatus::Stale,
    };
    debug!("{} is {}", path.display(), status);
    Ok(status)
}
