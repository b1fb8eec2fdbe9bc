use std::env;
use std::ffi::OsString;
use std::path::{Path,PathBuf};

use nix::unistd::{self,AccessFlags};
use tracing::trace;

use crate::error::ResolveError;

const PATH_KEY: &'static str = "PATH";

/// Maps command names to executable paths by walking a snapshot of `PATH`.
#[derive(Debug, Clone)]
pub struct PathResolver {
	path: Option<OsString>,
}

impl PathResolver {
	pub fn new(path: Option<OsString>) -> PathResolver {
		PathResolver { path: path }
	}

	pub fn from_env() -> PathResolver {
		PathResolver::new(env::var_os(PATH_KEY))
	}

	pub fn has_path(&self) -> bool {
		self.path.is_some()
	}

	/// Whether resolving `name` consults `PATH` at all.
	pub fn needs_path(name: &str) -> bool {
		!name.starts_with('/')
	}

	/// Absolute names come back untouched and unchecked; a missing file shows up at exec.
	/// Otherwise the first `PATH` entry holding `name` wins.
	pub fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
		if !PathResolver::needs_path(name) {
			return Ok(PathBuf::from(name));
		}
		let path = self.path.as_ref().ok_or(ResolveError::PathUnset)?;
		for dir in env::split_paths(path) {
			if dir.as_os_str().is_empty() {
				continue;
			}
			let candidate = dir.join(name);
			trace!(candidate = %candidate.display(), "probe");
			if exists(&candidate) {
				return Ok(candidate);
			}
		}
		Err(ResolveError::NotFound(name.to_string()))
	}
}

fn exists(path: &Path) -> bool {
	unistd::access(path, AccessFlags::F_OK).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	fn path_of(dirs: &[&Path]) -> Option<OsString> {
		Some(env::join_paths(dirs).unwrap())
	}

	fn touch(dir: &TempDir, name: &str) -> PathBuf {
		let p = dir.path().join(name);
		fs::write(&p, "").unwrap();
		p
	}

	#[test]
	fn absolute_name_is_returned_unchanged() {
		let resolver = PathResolver::new(None);
		assert_eq!(resolver.resolve("/no/such/binary"), Ok(PathBuf::from("/no/such/binary")));
	}

	#[test]
	fn first_matching_entry_wins() {
		let a = tempfile::tempdir().unwrap();
		let b = tempfile::tempdir().unwrap();
		let c = tempfile::tempdir().unwrap();
		touch(&b, "tool");
		touch(&c, "tool");
		let resolver = PathResolver::new(path_of(&[a.path(), b.path(), c.path()]));
		assert_eq!(resolver.resolve("tool"), Ok(b.path().join("tool")));
	}

	#[test]
	fn missing_everywhere_is_not_found() {
		let a = tempfile::tempdir().unwrap();
		touch(&a, "other");
		let resolver = PathResolver::new(path_of(&[a.path()]));
		assert_eq!(resolver.resolve("nonexistentcmd123"), Err(ResolveError::NotFound("nonexistentcmd123".to_string())));
	}

	#[test]
	fn unset_path_is_reported() {
		let resolver = PathResolver::new(None);
		assert!(!resolver.has_path());
		assert_eq!(resolver.resolve("ls"), Err(ResolveError::PathUnset));
	}

	#[test]
	fn empty_entries_are_skipped() {
		let a = tempfile::tempdir().unwrap();
		let expected = touch(&a, "tool");
		let mut path = OsString::from("::");
		path.push(a.path());
		path.push(":");
		let resolver = PathResolver::new(Some(path));
		assert_eq!(resolver.resolve("tool"), Ok(expected));
	}

	#[test]
	fn only_a_leading_slash_skips_the_search() {
		assert!(!PathResolver::needs_path("/bin/ls"));
		assert!(PathResolver::needs_path("ls"));
		assert!(PathResolver::needs_path("bin/ls"));
	}
}
