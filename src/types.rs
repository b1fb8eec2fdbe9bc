use std::fmt;
use std::path::PathBuf;

/// Command name followed by its arguments.
pub type ArgumentVector = Vec<String>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output }

impl RedirectType {
	pub fn from_token(token: &str) -> Option<RedirectType> {
		match token {
			"<" => Some(RedirectType::Input),
			">" => Some(RedirectType::Output),
			_ => None,
		}
	}

	pub fn symbol(self) -> &'static str {
		match self {
			RedirectType::Input => "<",
			RedirectType::Output => ">",
		}
	}

	/// Descriptor the redirection replaces.
	pub fn target_fd(self) -> i32 {
		match self {
			RedirectType::Input => libc::STDIN_FILENO,
			RedirectType::Output => libc::STDOUT_FILENO,
		}
	}
}

impl fmt::Display for RedirectType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Redirect {
	pub target: PathBuf,
	pub typ: RedirectType,
}

/// At most one input and at most one output file per stage.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct RedirectSpec {
	pub input: Option<PathBuf>,
	pub output: Option<PathBuf>,
}

impl RedirectSpec {
	pub fn is_empty(&self) -> bool {
		self.input.is_none() && self.output.is_none()
	}

	/// Input first, then output: the order files are opened in the child.
	pub fn redirects(&self) -> Vec<Redirect> {
		let input = self.input.iter().map(|p| Redirect { target: p.clone(), typ: RedirectType::Input });
		let output = self.output.iter().map(|p| Redirect { target: p.clone(), typ: RedirectType::Output });
		input.chain(output).collect()
	}
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Stage {
	pub argv: ArgumentVector,
	pub redirects: RedirectSpec,
}

impl Stage {
	pub fn name(&self) -> &str {
		&self.argv[0]
	}
}

/// Where one standard stream of a stage comes from once the pipeline is wired.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Binding {
	Inherit,
	/// Pipe number `n`, counted from the left; pipe `n` sits between stage `n` and `n + 1`.
	Pipe(usize),
	File(PathBuf),
}

/// A stage together with the descriptors it ends up with.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StagePlan {
	pub argv: ArgumentVector,
	pub stdin: Binding,
	pub stdout: Binding,
}
