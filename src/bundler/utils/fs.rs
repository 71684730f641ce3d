//! File system utilities for bundling.
//!
//! Thin async wrappers over `tokio::fs` that attach the offending path to
//! every error. Copies carry the source permissions and timestamps over.

use crate::bail;
use crate::bundler::error::{ErrorExt, Result};
use std::{
    fs::{File, FileTimes, Metadata},
    io,
    path::Path,
};
use tokio::fs;

/// Removes whatever lives at `path`: a directory tree, a file or a symlink.
///
/// Symlinks are removed themselves, never followed. Missing paths are not an error.
pub async fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("failed to inspect", path),
    };

    if metadata.is_dir() {
        log::debug!("Removing directory {}", path.display());
        fs::remove_dir_all(path)
            .await
            .fs_context("failed to remove directory", path)
    } else {
        log::debug!("Removing file {}", path.display());
        fs::remove_file(path)
            .await
            .fs_context("failed to remove file", path)
    }
}

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("failed to create directory", path)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Opens a file or directory with enough access to change its timestamps.
#[cfg(unix)]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Opens a file or directory with enough access to change its timestamps.
#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;

    std::fs::OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .custom_flags(FILE_FLAG_BACKUP_SEMANTICS)
        .open(path)
}

/// Applies the access and modification times in `source`, read from `from`,
/// to `to`.
async fn copy_times(source: &Metadata, from: &Path, to: &Path) -> Result<()> {
    let times = FileTimes::new()
        .set_accessed(source.accessed().fs_context("failed to read access time", from)?)
        .set_modified(
            source
                .modified()
                .fs_context("failed to read modification time", from)?,
        );

    let target = to.to_path_buf();
    tokio::task::spawn_blocking(move || open_for_times(&target)?.set_times(times))
        .await
        .map_err(io::Error::other)
        .and_then(|set| set)
        .fs_context("failed to set file times", to)
}

/// Creates a symbolic link at `link` pointing to the file `target`.
///
/// Fails if `target` is not an existing file.
pub async fn link_file(target: &Path, link: &Path) -> Result<()> {
    ensure_file(target).await?;
    if let Some(dest_dir) = link.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("failed to create directory", dest_dir)?;
    }
    symlink_file(target, link).fs_context("failed to create symlink", link)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Permissions and access/modification times are carried over. Fails if the
/// source path is a directory or doesn't exist. A symlinked source is copied
/// as the file it points to.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let source = ensure_file(from).await?;
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("failed to create directory", dest_dir)?;
    }
    log::debug!("Copying {} -> {}", from.display(), to.display());
    fs::copy(from, to).await.fs_context("failed to copy", from)?;
    copy_times(&source, from, to).await
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are followed: the destination holds copies of the files and
/// directories they point to, never links. Timestamps of copied directories
/// match their sources. Fails if the source path is not a directory or
/// doesn't exist, or if a symlink inside it is dangling.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from)
        .await
        .fs_context("failed to read source", from)?;
    if !metadata.is_dir() {
        bail!("{} is not a directory", from.display());
    }

    // Contents first, so a directory's times are set after it is filled.
    let walker = walkdir::WalkDir::new(from)
        .follow_links(true)
        .contents_first(true);
    for entry in walker {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_dir() {
            create_dir_all(&dest_path).await?;
            copy_times(&entry.metadata()?, entry.path(), &dest_path).await?;
        } else {
            copy_file(entry.path(), &dest_path).await?;
        }
    }

    Ok(())
}

/// Replaces `dst` with a copy of `src`.
///
/// Whatever exists at `dst` is removed first. Directories are copied
/// recursively, anything else is copied as a single file.
pub async fn replace_path(src: &Path, dst: &Path) -> Result<()> {
    let metadata = fs::metadata(src)
        .await
        .fs_context("failed to read source", src)?;

    remove_path(dst).await?;

    if metadata.is_dir() {
        copy_dir(src, dst).await
    } else {
        copy_file(src, dst).await
    }
}

async fn ensure_file(path: &Path) -> Result<Metadata> {
    let metadata = fs::metadata(path)
        .await
        .fs_context("failed to read source", path)?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    Ok(metadata)
}
