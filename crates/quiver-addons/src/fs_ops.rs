//! Directory tree copy and replace
//!
//! `replace_tree` puts a copy of a source tree at a destination path while
//! keeping scans of the parent directory consistent: the copy is built in a
//! hidden sibling and swapped in with renames, so a reader sees either the
//! previous tree or the complete new one.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively copy `src` into `dst` (created if missing), hidden files included
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", src.display()),
        ));
    }
    std::fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let link = std::fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::copy(src, dst).map(|_| ())
}

/// Replace `dst` with a copy of `src`.
///
/// Nothing from a previous `dst` survives. On error, a previous `dst` is
/// restored and no hidden sibling is left behind.
pub fn replace_tree(src: &Path, dst: &Path) -> io::Result<()> {
    let parent = dst
        .parent()
        .ok_or_else(|| io::Error::other(format!("{} has no parent", dst.display())))?;
    let name = dst
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{} has no file name", dst.display())))?
        .to_string_lossy()
        .to_string();

    std::fs::create_dir_all(parent)?;

    let token = uuid::Uuid::new_v4().simple().to_string();
    let incoming = parent.join(format!(".{}.incoming-{}", name, token));
    let replaced = parent.join(format!(".{}.replaced-{}", name, token));

    if let Err(e) = copy_tree(src, &incoming) {
        discard(&incoming);
        return Err(e);
    }

    let had_previous = match std::fs::symlink_metadata(dst) {
        Ok(_) => {
            if let Err(e) = std::fs::rename(dst, &replaced) {
                discard(&incoming);
                return Err(e);
            }
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            discard(&incoming);
            return Err(e);
        }
    };

    if let Err(e) = std::fs::rename(&incoming, dst) {
        if had_previous {
            if let Err(restore) = std::fs::rename(&replaced, dst) {
                warn!(
                    "Could not restore {} from {}: {}",
                    dst.display(),
                    replaced.display(),
                    restore
                );
            }
        }
        discard(&incoming);
        return Err(e);
    }

    if had_previous {
        discard(&replaced);
    }

    debug!("Replaced {} with {}", dst.display(), src.display());
    Ok(())
}

/// Best-effort removal of a directory or file
fn discard(path: &Path) {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(e) = result {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Async wrapper around `replace_tree`
pub async fn replace_tree_async(src: PathBuf, dst: PathBuf) -> io::Result<()> {
    tokio::task::spawn_blocking(move || replace_tree(&src, &dst))
        .await
        .map_err(io::Error::other)?
}
