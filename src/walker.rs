//! Recursive directory discovery.
//!
//! Symlinks found during a walk are never followed: a link is judged by its
//! own type, so a link to a directory is neither descended into nor reported
//! as a subdirectory, while a link whose name carries the requested extension
//! is reported by [`find_files_by_extension`].
use std::path::Path;
use std::path::PathBuf;

use async_recursion::async_recursion;
use futures_lite::StreamExt;
use log::debug;

use crate::errors::Error;
use crate::predicates::exists;
use crate::predicates::is_directory;
use crate::predicates::is_symlink;

/// Returns the extension of a file name including its leading dot, or an
/// empty string when the name has no dot.
///
/// `"a.tar.gz"` yields `".gz"` and `".bashrc"` yields `".bashrc"`.
pub fn dotted_extension(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i..]).unwrap_or("")
}

/// Recursively collects every non-directory entry under `root` whose name
/// ends in exactly `ext` (leading dot included, e.g. `".txt"`).
///
/// `root` must exist, be a directory and must not itself be a symlink.
/// Results come in pre-order, with each directory's entries in the order the
/// filesystem returns them.
pub async fn find_files_by_extension<P: AsRef<Path>>(
    root: P,
    ext: &str,
) -> Result<Vec<PathBuf>, Error> {
    const OP: &str = "find_files_by_extension";
    let root = root.as_ref();
    check_root(OP, root)?;
    if is_symlink(root)? {
        return Err(Error::symlink_rejected(OP, root));
    }
    let files = DirWalker::new(OP, Collect::Extension(ext.to_string()))
        .walk(root)
        .await?;
    debug!("{OP}: {} matches for {ext} under {}", files.len(), root.display());
    Ok(files)
}

/// Recursively collects every directory strictly below `root`.
pub async fn list_subdirectories<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, Error> {
    const OP: &str = "list_subdirectories";
    let root = root.as_ref();
    check_root(OP, root)?;
    DirWalker::new(OP, Collect::Directories).walk(root).await
}

fn check_root(op: &str, root: &Path) -> Result<(), Error> {
    if !exists(root) {
        return Err(Error::not_found(op, root));
    }
    if !is_directory(root) {
        return Err(Error::not_a_directory(op, root));
    }
    Ok(())
}

enum Collect {
    Extension(String),
    Directories,
}

struct DirWalker {
    op: &'static str,
    collect: Collect,
}

impl DirWalker {
    fn new(op: &'static str, collect: Collect) -> Self {
        Self { op, collect }
    }

    async fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut items = Vec::new();
        self.walk_recursive(root, &mut items).await?;
        Ok(items)
    }

    #[async_recursion]
    async fn walk_recursive(
        &self,
        dir_path: &Path,
        items: &mut Vec<PathBuf>,
    ) -> Result<(), Error> {
        let mut entries = async_fs::read_dir(dir_path)
            .await
            .map_err(|e| Error::io(self.op, "read directory", dir_path, e))?;

        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(|e| Error::io(self.op, "read entry", dir_path, e))?;
            let entry_path = entry.path();
            // does not follow symlinks
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::io(self.op, "stat", &entry_path, e))?;

            match &self.collect {
                Collect::Extension(ext) => {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if !file_type.is_dir() && dotted_extension(&name) == ext.as_str() {
                        items.push(entry_path.clone());
                    }
                }
                Collect::Directories => {
                    if file_type.is_dir() {
                        items.push(entry_path.clone());
                    }
                }
            }

            if file_type.is_dir() {
                self.walk_recursive(&entry_path, items).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::Error;
    use crate::TestRoot;
    use crate::walker::*;

    #[test]
    fn dotted_extension_matches_last_dot() {
        assert_eq!(dotted_extension("a.txt"), ".txt");
        assert_eq!(dotted_extension("a.tar.gz"), ".gz");
        assert_eq!(dotted_extension(".bashrc"), ".bashrc");
        assert_eq!(dotted_extension("Makefile"), "");
    }

    #[tokio::test]
    async fn finds_files_recursively() {
        let root = TestRoot::new().unwrap();
        let found = find_files_by_extension(root.root.path(), ".txt")
            .await
            .unwrap();
        assert_eq!(
            root.relative(&found),
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/c.txt")]
        );
    }

    #[tokio::test]
    async fn extension_needs_exact_suffix() {
        let mut root = TestRoot::new().unwrap();
        root.create_file("sub/nested/notes.TXT", "").unwrap();
        root.create_dir("dir.txt").unwrap();
        let found = find_files_by_extension(root.root.path(), ".txt")
            .await
            .unwrap();
        assert_eq!(
            root.relative(&found),
            vec![PathBuf::from("a.txt"), PathBuf::from("sub/c.txt")]
        );
        let found = find_files_by_extension(root.root.path(), "txt")
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn find_rejects_bad_roots() {
        let root = TestRoot::new().unwrap();
        assert!(matches!(
            find_files_by_extension(root.path("missing"), ".txt").await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            find_files_by_extension(root.path("a.txt"), ".txt").await,
            Err(Error::NotADirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn find_rejects_symlinked_root() {
        let mut root = TestRoot::new().unwrap();
        root.create_symlink("sub", "link_dir").unwrap();
        assert!(matches!(
            find_files_by_extension(root.path("link_dir"), ".txt").await,
            Err(Error::SymlinkRejected { .. })
        ));
        // no symlink rejection for subdirectory listing
        let dirs = list_subdirectories(root.path("link_dir")).await.unwrap();
        assert_eq!(dirs.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_root_is_not_found() {
        let mut root = TestRoot::new().unwrap();
        root.create_symlink("gone", "dangling").unwrap();
        assert!(matches!(
            find_files_by_extension(root.path("dangling"), ".txt").await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            list_subdirectories(root.path("dangling")).await,
            Err(Error::NotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_followed_mid_walk() {
        let mut root = TestRoot::new().unwrap();
        root.create_symlink("a.txt", "link_file.txt").unwrap();
        root.create_symlink("sub", "link_dir").unwrap();

        let found = find_files_by_extension(root.root.path(), ".txt")
            .await
            .unwrap();
        assert_eq!(
            root.relative(&found),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("link_file.txt"),
                PathBuf::from("sub/c.txt"),
            ]
        );

        let dirs = list_subdirectories(root.root.path()).await.unwrap();
        assert_eq!(
            root.relative(&dirs),
            vec![
                PathBuf::from("empty"),
                PathBuf::from("sub"),
                PathBuf::from("sub/nested"),
            ]
        );
    }

    #[tokio::test]
    async fn lists_subdirectories_without_root() {
        let root = TestRoot::new().unwrap();
        let dirs = list_subdirectories(root.root.path()).await.unwrap();
        assert!(!dirs.contains(&root.root.path().to_path_buf()));
        assert_eq!(
            root.relative(&dirs),
            vec![
                PathBuf::from("empty"),
                PathBuf::from("sub"),
                PathBuf::from("sub/nested"),
            ]
        );
        assert!(list_subdirectories(root.path("empty")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parent_directories_come_before_children() {
        let root = TestRoot::new().unwrap();
        let dirs = list_subdirectories(root.root.path()).await.unwrap();
        let sub = dirs.iter().position(|p| p.ends_with("sub")).unwrap();
        let nested = dirs.iter().position(|p| p.ends_with("nested")).unwrap();
        assert!(sub < nested);
    }
}
