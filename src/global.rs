use std::os::unix::io::RawFd;

use nix::unistd;

use crate::search::PathResolver;

/// Interpreter state threaded through the read loop and the built-ins.
pub struct Context {
	pub terminal: RawFd,
	pub is_interactive: bool,
	pub line_num: usize,
	pub should_exit: bool,
	pub resolver: PathResolver,
}

impl Context {
	pub fn new(resolver: PathResolver) -> Context {
		let terminal = libc::STDIN_FILENO;
		Context {
			terminal: terminal,
			is_interactive: unistd::isatty(terminal).unwrap_or(false),
			line_num: 0,
			should_exit: false,
			resolver: resolver,
		}
	}
}
