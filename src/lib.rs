//! Small, independent helpers for everyday tooling: inspecting and
//! manipulating files, hashing them, reporting their size, fetching them over
//! HTTP, and a handful of OS, slice, string and time utilities.
//!
//! Filesystem, network and process helpers are `async` and run on the
//! caller's tokio task; nothing is spawned in the background.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use toolbelt::{find_files_by_extension, format_file_size, sha256_digest};
//!
//! let sources = find_files_by_extension("src", ".rs").await.unwrap();
//! assert!(sources.iter().any(|p| p.ends_with("lib.rs")));
//!
//! let digest = sha256_digest("Cargo.toml").await.unwrap();
//! assert_eq!(digest.len(), 64);
//! println!("{}", format_file_size("Cargo.toml", "kb").await.unwrap());
//! # })
//! ```
//!
//! All fallible operations return [`Error`], which names the operation and
//! the target that failed, e.g.
//! `clear_directory: target does not exist [/tmp/build]`.

mod errors;
pub mod fetch;
mod file;
pub mod hash;
pub mod os;
mod predicates;
mod size;
pub mod slices;
pub mod strings;
pub mod time;
mod walker;

pub use errors::Error;
pub use fetch::FetchConfig;
pub use fetch::Fetcher;
pub use file::append_bytes;
pub use file::clear_directory;
pub use file::create_empty_file;
pub use file::ensure_directory;
#[cfg(unix)]
pub use file::FILE_MODE;
pub use file::file_name_without_extension;
pub use file::file_size_bytes;
pub use file::open_for_append;
pub use file::write_all;
pub use hash::md5_digest;
pub use hash::sha256_bytes;
pub use hash::sha256_digest;
pub use predicates::directory_is_writable;
pub use predicates::exists;
pub use predicates::is_directory;
pub use predicates::is_file;
pub use predicates::is_symlink;
pub use predicates::is_writable;
pub use size::SizeUnit;
pub use size::convert_bytes;
pub use size::format_bytes;
pub use size::format_file_size;
pub use walker::dotted_extension;
pub use walker::find_files_by_extension;
pub use walker::list_subdirectories;

#[cfg(feature = "test_utils")]
pub(crate) mod test_utils;
#[cfg(feature = "test_utils")]
pub use test_utils::TestRoot;
