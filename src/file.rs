//! Creating, filling and emptying files and directories.
use std::path::Path;

use log::debug;
use log::warn;
use tokio::fs;
use tokio::fs::File;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::errors::Error;
use crate::predicates::exists;
use crate::predicates::is_symlink;
use crate::walker::dotted_extension;

/// Permission bits requested for files created by this module.
#[cfg(unix)]
pub const FILE_MODE: u32 = 0o655;

/// Creates `path` and all missing ancestors.
///
/// An existing symlink at `path` is left alone. An existing directory is not
/// an error; a regular file in the way is.
pub async fn ensure_directory<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    const OP: &str = "ensure_directory";
    let path = path.as_ref();
    if exists(path) && is_symlink(path)? {
        debug!("{OP}: {} is a symlink, leaving it", path.display());
        return Ok(());
    }
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io(OP, "create directory", path, e))
}

/// Creates a zero-length file. Fails if anything already occupies `path`.
pub async fn create_empty_file<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    const OP: &str = "create_empty_file";
    let path = path.as_ref();
    if exists(path) {
        return Err(Error::already_exists(OP, path));
    }
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options.open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            Error::already_exists(OP, path)
        } else {
            Error::io(OP, "create", path, e)
        }
    })?;
    debug!("{OP}: created {}", path.display());
    Ok(())
}

/// Removes every entry inside `path`, keeping the directory itself.
///
/// All children are attempted even when some fail; the first failure is
/// returned.
pub async fn clear_directory<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    const OP: &str = "clear_directory";
    let path = path.as_ref();
    if !exists(path) {
        return Err(Error::not_found(OP, path));
    }
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| Error::io(OP, "read directory", path, e))?;

    let mut first_error = None;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                first_error.get_or_insert(Error::io(OP, "read entry", path, e));
                break;
            }
        };
        let child = entry.path();
        if let Err(e) = remove_entry(&child).await {
            let e = Error::io(OP, "remove", &child, e);
            warn!("{e}");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

// Symlinks are unlinked, never followed.
async fn remove_entry(child: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(child).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(child).await
    } else {
        fs::remove_file(child).await
    }
}

/// Opens `path` for reading and appending, creating it when missing.
///
/// The caller owns the returned handle; it is closed when dropped.
pub async fn open_for_append<P: AsRef<Path>>(path: P) -> Result<File, Error> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.create(true).append(true).read(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options
        .open(path)
        .await
        .map_err(|e| Error::io("open_for_append", "open", path, e))
}

/// Appends `content` to `path`, creating the file when missing.
pub async fn write_all<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> Result<(), Error> {
    const OP: &str = "write_all";
    let path = path.as_ref();
    let mut file = open_for_append(path).await?;
    file.write_all(content.as_ref())
        .await
        .map_err(|e| Error::io(OP, "write", path, e))?;
    file.flush()
        .await
        .map_err(|e| Error::io(OP, "write", path, e))
}

/// Writes raw bytes to an already open handle.
///
/// Waits for the write to land in the file but neither syncs nor closes the
/// handle.
pub async fn append_bytes(file: &mut File, data: &[u8]) -> Result<(), Error> {
    const OP: &str = "append_bytes";
    file.write_all(data)
        .await
        .map_err(|e| Error::handle_io(OP, "write", e))?;
    file.flush()
        .await
        .map_err(|e| Error::handle_io(OP, "write", e))
}

/// Size of the file at `path` in bytes. Follows symlinks.
pub async fn file_size_bytes<P: AsRef<Path>>(path: P) -> Result<u64, Error> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| Error::io("file_size_bytes", "stat", path, e))?;
    Ok(metadata.len())
}

/// Base name of `path` with its last extension removed.
///
/// `"dir/archive.tar.gz"` yields `"archive.tar"`.
pub fn file_name_without_extension<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext_len = dotted_extension(&name).len();
    name[..name.len() - ext_len].to_string()
}
