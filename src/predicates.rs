//! Read-only queries about a path.
//!
//! None of these functions touch the filesystem beyond a `stat`/`lstat` or
//! an access check.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::Error;

/// Returns `false` only when the path is definitely absent.
///
/// Follows symlinks, so a dangling symlink does not exist. Any other stat
/// failure, such as a permission error on a parent directory, is reported as
/// `true` because something may occupy the path.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(_) => true,
    }
}

/// Whether the path resolves to anything but a directory.
///
/// Follows symlinks. Returns `false` when the path cannot be stat'ed.
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Whether the path resolves to a directory.
///
/// Follows symlinks. Returns `false` when the path cannot be stat'ed.
pub fn is_directory<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Whether the path itself is a symlink.
///
/// Unlike [`exists`], a missing path is an error here.
pub fn is_symlink<P: AsRef<Path>>(path: P) -> Result<bool, Error> {
    let path = path.as_ref();
    let metadata =
        fs::symlink_metadata(path).map_err(|e| Error::io("is_symlink", "stat", path, e))?;
    Ok(metadata.file_type().is_symlink())
}

/// Whether the effective user may both read and write the path.
///
/// Returns `false` on any failure, including a missing path.
pub fn is_writable<P: AsRef<Path>>(path: P) -> bool {
    access_read_write(path.as_ref())
}

/// Like [`is_writable`] but insists that the path is an existing directory.
pub fn directory_is_writable<P: AsRef<Path>>(path: P) -> Result<bool, Error> {
    let path = path.as_ref();
    if !exists(path) {
        return Err(Error::not_found("directory_is_writable", path));
    }
    if !is_directory(path) {
        return Err(Error::not_a_directory("directory_is_writable", path));
    }
    Ok(is_writable(path))
}

#[cfg(target_os = "linux")]
fn access_read_write(path: &Path) -> bool {
    use nix::unistd::AccessFlags;

    nix::unistd::eaccess(path, AccessFlags::R_OK | AccessFlags::W_OK).is_ok()
}

#[cfg(all(unix, not(target_os = "linux")))]
fn access_read_write(path: &Path) -> bool {
    use nix::unistd::AccessFlags;

    nix::unistd::access(path, AccessFlags::R_OK | AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn access_read_write(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use crate::TestRoot;
    use crate::predicates::*;

    #[test]
    fn missing_path_is_nothing() {
        let root = TestRoot::new().unwrap();
        let missing = root.path("nofile.txt");
        assert!(!exists(&missing));
        assert!(!is_file(&missing));
        assert!(!is_directory(&missing));
        assert!(!is_writable(&missing));
        assert!(is_symlink(&missing).is_err());
    }

    #[test]
    fn file_and_directory_are_exclusive() {
        let root = TestRoot::new().unwrap();
        let file = root.path("a.txt");
        let dir = root.path("sub");

        assert!(exists(&file));
        assert!(is_file(&file));
        assert!(!is_directory(&file));

        assert!(exists(&dir));
        assert!(is_directory(&dir));
        assert!(!is_file(&dir));

        assert!(!is_symlink(&file).unwrap());
        assert!(!is_symlink(&dir).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_followed_for_type_checks() {
        let mut root = TestRoot::new().unwrap();
        root.create_symlink("a.txt", "link_file.txt").unwrap();
        root.create_symlink("sub", "link_dir").unwrap();

        assert!(is_symlink(root.path("link_file.txt")).unwrap());
        assert!(is_symlink(root.path("link_dir")).unwrap());
        assert!(is_file(root.path("link_file.txt")));
        assert!(is_directory(root.path("link_dir")));
        assert!(exists(root.path("link_dir")));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_does_not_exist() {
        let mut root = TestRoot::new().unwrap();
        root.create_symlink("gone.txt", "dangling").unwrap();
        assert!(!exists(root.path("dangling")));
        assert!(!is_file(root.path("dangling")));
        assert!(is_symlink(root.path("dangling")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_file_is_not_writable() {
        let mut root = TestRoot::new().unwrap();
        root.create_file("0444.perm", "").unwrap();
        root.set_mode("0444.perm", 0o444).unwrap();
        root.create_file("0644.perm", "").unwrap();
        root.set_mode("0644.perm", 0o644).unwrap();

        assert!(is_writable(root.path("0644.perm")));
        assert!(is_writable(root.path("sub")));
        // root bypasses permission bits
        if !nix::unistd::geteuid().is_root() {
            assert!(!is_writable(root.path("0444.perm")));
        }
    }

    #[test]
    fn directory_is_writable_checks_target() {
        let root = TestRoot::new().unwrap();
        assert!(directory_is_writable(root.path("sub")).unwrap());
        assert!(matches!(
            directory_is_writable(root.path("a.txt")),
            Err(crate::Error::NotADirectory { .. })
        ));
        assert!(matches!(
            directory_is_writable(root.path("nofolder")),
            Err(crate::Error::NotFound { .. })
        ));
    }
}
