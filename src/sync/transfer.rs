use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::TransferError;
use super::path;
use super::types::{PathKind, PathSpec};

const LABEL_SUFFIX: &str = " Config";
const DIRECTORY_SEGMENT: &str = "config";

/// Where `spec` lands under `destination_root`.
///
/// Directories are nested one level deeper than files, under a fixed
/// `config` segment.
pub fn destination_for(spec: &PathSpec, destination_root: &Path, is_dir: bool) -> PathBuf {
    let name = spec
        .label
        .strip_suffix(LABEL_SUFFIX)
        .unwrap_or(&spec.label);
    let dest = destination_root.join(name);
    if is_dir { dest.join(DIRECTORY_SEGMENT) } else { dest }
}

/// Destination for display, probing the filesystem for directory-ness.
pub fn display_destination(spec: &PathSpec, destination_root: &Path) -> PathBuf {
    let is_dir = spec.kind == PathKind::Directory || path::resolve(&spec.source).is_dir();
    destination_for(spec, destination_root, is_dir)
}

/// Copy one configured entry into `destination_root`.
///
/// Directory transfers replace whatever was at the destination. File
/// transfers overwrite in place. Returns the destination that was written.
pub fn transfer(spec: &PathSpec, destination_root: &Path) -> Result<PathBuf, TransferError> {
    let source = path::resolve(&spec.source);

    let metadata =
        fs::metadata(&source).map_err(|e| TransferError::source_not_found(&spec.source, e))?;

    let is_dir = spec.kind == PathKind::Directory || metadata.is_dir();
    let dest = destination_for(spec, destination_root, is_dir);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| TransferError::unwritable(parent, e))?;
    }

    if is_dir {
        if fs::symlink_metadata(&dest).is_ok() {
            remove_existing(&dest)?;
        }
        copy_dir(&source, &dest)?;
    } else {
        copy_file(&source, &dest)?;
    }

    Ok(dest)
}

fn remove_existing(dest: &Path) -> Result<(), TransferError> {
    let result = match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dest),
        Ok(_) => fs::remove_file(dest),
        Err(e) => Err(e),
    };
    result.map_err(|e| TransferError::unwritable(dest, e))
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), TransferError> {
    let data = fs::read(source)
        .map_err(|e| TransferError::source_not_found(source.display().to_string(), e))?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| TransferError::unwritable(parent, e))?;
    }

    fs::write(dest, data).map_err(|e| TransferError::unwritable(dest, e))
}

fn copy_dir(source: &Path, dest: &Path) -> Result<(), TransferError> {
    let mut created_dirs = Vec::new();

    for entry in WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .unwrap_or(source)
                .display()
                .to_string();
            TransferError::source_not_found(path, e.into())
        })?;

        // A plain file walked as a directory yields only the root entry.
        let target = match entry.path().strip_prefix(source) {
            Ok(relative) if !relative.as_os_str().is_empty() => dest.join(relative),
            _ => dest.to_path_buf(),
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| TransferError::unwritable(&target, e))?;
            let permissions = entry
                .metadata()
                .map_err(|e| {
                    TransferError::source_not_found(entry.path().display().to_string(), e.into())
                })?
                .permissions();
            created_dirs.push((target, permissions));
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    // Applied last and deepest first so read-only directories can still be filled.
    for (dir, permissions) in created_dirs.into_iter().rev() {
        fs::set_permissions(&dir, permissions).map_err(|e| TransferError::unwritable(&dir, e))?;
    }

    Ok(())
}
