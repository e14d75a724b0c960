use std::collections::BTreeSet;
use std::fs;
use std::fs::create_dir_all;
use std::path::Path as StdPath;
use std::path::PathBuf;

use tempdir::TempDir;

use crate::Error;

// Relative paths and contents to create in the temporary test root.
// Entries with `None` contents are directories.
pub(crate) static TEMP_FILES: &[(&str, Option<&str>)] = &[
    ("a.txt", Some("")),
    ("b.md", Some("# b")),
    ("sub", None),
    ("sub/c.txt", Some("c")),
    ("sub/nested", None),
    ("empty", None),
];

/// Utility structure for managing a temporary test directory and its files.
///
/// The tree is removed when the value is dropped.
#[derive(Debug)]
pub struct TestRoot {
    /// Root of the temporary test directory.
    pub root: TempDir,
    /// Relative paths created in the test root.
    pub files: BTreeSet<PathBuf>,
}

impl TestRoot {
    /// Creates a temporary directory populated with a small fixed tree:
    ///
    /// ```text
    /// a.txt  b.md  empty/  sub/c.txt  sub/nested/
    /// ```
    pub fn new() -> Result<Self, Error> {
        let root = TempDir::new("toolbelt").map_err(|e| {
            Error::io("TestRoot::new", "create", StdPath::new("temporary directory"), e)
        })?;
        let mut ret = Self {
            root,
            files: BTreeSet::new(),
        };
        for (relative_path, contents) in TEMP_FILES {
            match contents {
                Some(contents) => ret.create_file(relative_path, contents)?,
                None => ret.create_dir(relative_path)?,
            }
        }
        Ok(ret)
    }

    /// Absolute path of `relative_path` inside the root.
    pub fn path(&self, relative_path: &str) -> PathBuf {
        self.root.path().join(relative_path)
    }

    /// Creates (or overwrites) a file, creating missing parent directories.
    pub fn create_file(&mut self, relative_path: &str, content: &str) -> Result<(), Error> {
        let full_path = self.path(relative_path);
        if let Some(parent) = full_path.parent() {
            create_dir_all(parent)
                .map_err(|e| Error::io("TestRoot::create_file", "create", parent, e))?;
        }
        fs::write(&full_path, content)
            .map_err(|e| Error::io("TestRoot::create_file", "write", &full_path, e))?;
        self.files.insert(relative_path.into());
        Ok(())
    }

    /// Creates a directory and its missing parents.
    pub fn create_dir(&mut self, relative_path: &str) -> Result<(), Error> {
        let full_path = self.path(relative_path);
        create_dir_all(&full_path)
            .map_err(|e| Error::io("TestRoot::create_dir", "create", &full_path, e))?;
        self.files.insert(relative_path.into());
        Ok(())
    }

    /// Creates a symlink at `link` pointing to `target`, both relative to the
    /// root.
    #[cfg(unix)]
    pub fn create_symlink(&mut self, target: &str, link: &str) -> Result<(), Error> {
        let link_path = self.path(link);
        std::os::unix::fs::symlink(self.path(target), &link_path)
            .map_err(|e| Error::io("TestRoot::create_symlink", "symlink", &link_path, e))?;
        self.files.insert(link.into());
        Ok(())
    }

    /// Sets unix permission bits on an entry.
    #[cfg(unix)]
    pub fn set_mode(&self, relative_path: &str, mode: u32) -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        let full_path = self.path(relative_path);
        fs::set_permissions(&full_path, fs::Permissions::from_mode(mode))
            .map_err(|e| Error::io("TestRoot::set_mode", "chmod", &full_path, e))
    }

    /// Converts absolute paths under the root back to sorted relative paths.
    pub fn relative(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut ret: Vec<PathBuf> = paths
            .iter()
            .filter_map(|p| p.strip_prefix(self.root.path()).ok())
            .map(StdPath::to_path_buf)
            .collect();
        ret.sort();
        ret
    }
}
