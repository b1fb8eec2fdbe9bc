use std::io;
use std::io::Write;

use nix::unistd::ForkResult;
use tracing::{debug,warn};

use crate::builtin;
use crate::error::{FatalError,ResolveError};
use crate::global::Context;
use crate::pipeline::{self,PipelineExecutor};
use crate::process::{Process,WaitStatusExt};
use crate::search::PathResolver;
use crate::types::ArgumentVector;

/// Status reported for a line rejected before anything ran.
pub const SYNTAX_ERROR_STATUS: u8 = 2;

/// Runs one input line: built-ins in this process, everything else in one forked child.
pub struct Dispatcher<P: Process> {
	process: P,
}

impl<P: Process> Dispatcher<P> {
	pub fn new(process: P) -> Dispatcher<P> {
		Dispatcher { process: process }
	}

	#[cfg(test)]
	pub fn process(&self) -> &P {
		&self.process
	}

	/// Errors are fatal to the interpreter; every other failure is a status.
	pub fn dispatch(&mut self, ctx: &mut Context, tokens: ArgumentVector, out: &mut dyn Write) -> Result<u8, FatalError> {
		let name = match tokens.first() {
			Some(name) => name.as_str(),
			None => return Ok(0),
		};
		if let Some(func) = builtin::match_builtin(name) {
			debug!(name = name, "builtin");
			return Ok(func(ctx, &tokens[1 ..], out));
		}

		let stages = match pipeline::plan(tokens) {
			Ok(stages) => stages,
			Err(e) => {
				let _ = writeln!(&mut io::stderr(), "{}", e);
				return Ok(SYNTAX_ERROR_STATUS);
			},
		};
		if !ctx.resolver.has_path() && stages.iter().any(|s| PathResolver::needs_path(s.name())) {
			return Err(ResolveError::PathUnset.into());
		}
		debug!(stages = ?pipeline::bindings(&stages), "pipeline");

		// the child must not inherit unflushed output
		let _ = out.flush();
		let _ = io::stdout().flush();
		match self.process.fork() {
			Err(e) => {
				warn!(error = %e, "fork failed");
				let _ = writeln!(&mut io::stderr(), "fork: {}", e);
				Ok(1)
			},
			Ok(ForkResult::Child) => {
				let status = PipelineExecutor::new(&mut self.process, &ctx.resolver).run(&stages);
				self.process.exit(status);
				Ok(status)
			},
			Ok(ForkResult::Parent { child }) => match self.process.wait(child) {
				Ok(status) => Ok(status.code()),
				Err(e) => {
					let _ = writeln!(&mut io::stderr(), "wait: {}", e);
					Ok(1)
				},
			},
		}
	}
}
