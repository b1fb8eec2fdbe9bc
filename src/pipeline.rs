use std::convert::Infallible;
use std::io;
use std::io::Write;

use nix::errno::Errno;
use nix::unistd::ForkResult;
use tracing::debug;

use crate::error::{ExecError,SyntaxError};
use crate::process::Process;
use crate::redirect;
use crate::search::PathResolver;
use crate::types::{ArgumentVector,Binding,Stage,StagePlan};

const PIPE: &'static str = "|";

/// Splits `argv` on `|` and validates every stage before anything is forked.
pub fn plan(argv: ArgumentVector) -> Result<Vec<Stage>, SyntaxError> {
	if argv.is_empty() {
		return Err(SyntaxError::EmptyCommand);
	}
	if argv[0] == PIPE {
		return Err(SyntaxError::LeadingPipe);
	}

	let mut segments: Vec<ArgumentVector> = vec![vec![]];
	for token in argv {
		if token == PIPE {
			segments.push(vec![]);
		} else if let Some(last) = segments.last_mut() {
			last.push(token);
		}
	}

	let mut stages = Vec::with_capacity(segments.len());
	for segment in segments {
		if segment.is_empty() {
			return Err(SyntaxError::EmptyPipeSegment);
		}
		let (argv, redirects) = redirect::extract(segment)?;
		if argv.is_empty() {
			return Err(SyntaxError::EmptyCommand);
		}
		stages.push(Stage { argv: argv, redirects: redirects });
	}
	Ok(stages)
}

/// The descriptors each stage ends up with once pipes and files are in place.
/// A file redirection wins over the pipe on the same side.
pub fn bindings(stages: &[Stage]) -> Vec<StagePlan> {
	let last = stages.len().saturating_sub(1);
	stages.iter().enumerate().map(|(i, stage)| {
		let stdin = match stage.redirects.input {
			Some(ref p) => Binding::File(p.clone()),
			None if i > 0 => Binding::Pipe(i - 1),
			None => Binding::Inherit,
		};
		let stdout = match stage.redirects.output {
			Some(ref p) => Binding::File(p.clone()),
			None if i < last => Binding::Pipe(i),
			None => Binding::Inherit,
		};
		StagePlan { argv: stage.argv.clone(), stdin: stdin, stdout: stdout }
	}).collect()
}

/// Builds a pipeline inside an already forked process.
///
/// One pipe and one fork per `|`: the child takes the read end and recurses on
/// the stages to the right, the parent takes the write end and becomes the
/// leftmost stage. Nothing here waits; each process ends up as a command image.
pub struct PipelineExecutor<'a, P: Process + 'a> {
	process: &'a mut P,
	resolver: &'a PathResolver,
}

impl<'a, P: Process> PipelineExecutor<'a, P> {
	pub fn new(process: &'a mut P, resolver: &'a PathResolver) -> PipelineExecutor<'a, P> {
		PipelineExecutor { process: process, resolver: resolver }
	}

	/// Only returns when a stage could not be started; the result is the status to exit with.
	pub fn run(&mut self, stages: &[Stage]) -> u8 {
		match self.run_stages(stages) {
			Ok(never) => match never {},
			Err(e) => {
				let _ = writeln!(&mut io::stderr(), "{}", e);
				1
			},
		}
	}

	fn run_stages(&mut self, stages: &[Stage]) -> Result<Infallible, ExecError> {
		let (first, rest) = match stages.split_first() {
			Some(split) => split,
			None => return Err(ExecError::Nix(Errno::EINVAL)),
		};
		if rest.is_empty() {
			return self.exec_stage(first);
		}

		let (pipe_read, pipe_write) = self.process.pipe()?;
		match self.process.fork() {
			Err(e) => {
				let _ = self.process.close(pipe_read);
				let _ = self.process.close(pipe_write);
				Err(e.into())
			},
			Ok(ForkResult::Child) => {
				self.process.close(pipe_write)?;
				let r = self.process.dup2(pipe_read, libc::STDIN_FILENO);
				self.process.close(pipe_read)?;
				r?;
				self.run_stages(rest)
			},
			Ok(ForkResult::Parent { child }) => {
				debug!(pid = child.as_raw(), stage = first.name(), "spawned right-hand side");
				self.process.close(pipe_read)?;
				let r = self.process.dup2(pipe_write, libc::STDOUT_FILENO);
				self.process.close(pipe_write)?;
				r?;
				self.exec_stage(first)
			},
		}
	}

	fn exec_stage(&mut self, stage: &Stage) -> Result<Infallible, ExecError> {
		if !stage.redirects.is_empty() {
			redirect::apply(&mut *self.process, &stage.redirects)?;
		}
		let path = self.resolver.resolve(stage.name())?;
		self.process.exec(&path, &stage.argv).map_err(|e| match e {
			ExecError::Nix(errno) => ExecError::Exec { name: stage.name().to_string(), source: errno },
			e => e,
		})
	}
}
