use std::{ffi,io};

use thiserror::Error;

use crate::types::RedirectType;

/// Malformed command line. Detected before any process or file is touched.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SyntaxError {
	#[error("syntax error: missing command")]
	EmptyCommand,
	#[error("syntax error: no command before '|'")]
	LeadingPipe,
	#[error("syntax error: empty command after '|'")]
	EmptyPipeSegment,
	#[error("more than one redirection symbol '{0}'")]
	DuplicateRedirect(RedirectType),
	#[error("syntax error for {0}")]
	MissingRedirectTarget(RedirectType),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResolveError {
	#[error("PATH environment variable is not set")]
	PathUnset,
	#[error("command not found: {0}")]
	NotFound(String),
}

/// Failure while building or entering a stage. Local to the process it happens in.
#[derive(Debug, Error)]
pub enum ExecError {
	#[error("{0}")]
	Nix(#[from] nix::Error),
	#[error("nul char in argument: {0}")]
	Nul(#[from] ffi::NulError),
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error("{path}: {source}")]
	Open { path: String, source: nix::Error },
	#[error("{name}: execution failed: {source}")]
	Exec { name: String, source: nix::Error },
}

/// Ends the read loop.
#[derive(Debug, Error)]
pub enum FatalError {
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error("cannot read input: {0}")]
	Io(#[from] io::Error),
}
