//! Source → destination placement, computed once before any copying

use crate::types::SmartCopyError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One source and the path it is mirrored to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPair {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Validated placement for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    pub pairs: Vec<SyncPair>,

    /// Destination directory must be created before copying (multi-source only)
    pub create_destination: bool,
}

/// Resolve where each source lands.
///
/// Single source, cp-like: into `destination/<name>` when `destination` is an
/// existing directory, otherwise at `destination` itself.
///
/// Multiple sources: always into `destination/<name>`; `destination` must be a
/// directory or absent. An existing plain file is rejected, and so are two
/// sources that share a base name, since they would land in one target.
///
/// Only stats; nothing is written.
pub fn resolve_targets(sources: &[PathBuf], destination: &Path) -> Result<TargetPlan, SmartCopyError> {
    for source in sources {
        match fs::metadata(source) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SmartCopyError::MissingSource {
                    path: source.clone(),
                })
            }
            Err(e) => return Err(SmartCopyError::access("get source info for", source, e)),
        }
    }

    let dest_metadata = fs::metadata(destination).ok();
    let dest_exists = dest_metadata.is_some();
    let dest_is_dir = dest_metadata.as_ref().is_some_and(|m| m.is_dir());

    if sources.len() > 1 && dest_exists && !dest_is_dir {
        return Err(SmartCopyError::InvalidArguments(
            "when copying multiple sources, destination must be a directory".to_string(),
        ));
    }

    let nest = sources.len() > 1 || dest_is_dir;
    let pairs = sources
        .iter()
        .map(|source| -> Result<SyncPair, SmartCopyError> {
            let target = if nest {
                destination.join(base_name(source)?)
            } else {
                destination.to_path_buf()
            };
            Ok(SyncPair {
                source: source.clone(),
                target,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    for pair in &pairs {
        if let Some(previous) = claimed.insert(&pair.target, &pair.source) {
            return Err(SmartCopyError::InvalidArguments(format!(
                "sources '{}' and '{}' would both be placed at '{}'",
                previous.display(),
                pair.source.display(),
                pair.target.display()
            )));
        }
    }

    Ok(TargetPlan {
        pairs,
        create_destination: sources.len() > 1 && !dest_exists,
    })
}

/// Final component of `path`, resolving `.`/`..` against the filesystem when needed
fn base_name(path: &Path) -> Result<PathBuf, SmartCopyError> {
    if let Some(name) = path.file_name() {
        return Ok(PathBuf::from(name));
    }

    let canonical = fs::canonicalize(path)
        .map_err(|e| SmartCopyError::access("resolve source path", path, e))?;
    canonical.file_name().map(PathBuf::from).ok_or_else(|| {
        SmartCopyError::InvalidArguments(format!(
            "cannot place '{}' inside a directory: it has no base name",
            path.display()
        ))
    })
}
