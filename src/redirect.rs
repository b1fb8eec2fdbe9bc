use std::path::PathBuf;

use crate::error::{ExecError,SyntaxError};
use crate::process::Process;
use crate::types::{ArgumentVector,RedirectSpec,RedirectType};

/// Pulls `< file` and `> file` out of `argv`.
///
/// Operators are matched as whole tokens only, so `a>b` or `<<` stay plain
/// arguments. The remaining tokens keep their relative order.
pub fn extract(argv: ArgumentVector) -> Result<(ArgumentVector, RedirectSpec), SyntaxError> {
	for &typ in &[RedirectType::Output, RedirectType::Input] {
		if argv.iter().filter(|t| t.as_str() == typ.symbol()).count() > 1 {
			return Err(SyntaxError::DuplicateRedirect(typ));
		}
	}

	let mut spec = RedirectSpec::default();
	let mut clean = Vec::with_capacity(argv.len());
	let mut tokens = argv.into_iter();
	while let Some(token) = tokens.next() {
		let typ = match RedirectType::from_token(&token) {
			Some(typ) => typ,
			None => {
				clean.push(token);
				continue;
			},
		};
		let target = match tokens.next() {
			Some(ref t) if RedirectType::from_token(t).is_some() => None,
			t => t,
		};
		let target = PathBuf::from(target.ok_or(SyntaxError::MissingRedirectTarget(typ))?);
		match typ {
			RedirectType::Input => spec.input = Some(target),
			RedirectType::Output => spec.output = Some(target),
		}
	}
	Ok((clean, spec))
}

/// Opens the redirection targets and puts them over stdin/stdout.
///
/// Runs in the stage's own process after fork, so the interpreter's streams are
/// never touched. Every opened descriptor is closed again, on failure too.
pub fn apply<P: Process>(process: &mut P, spec: &RedirectSpec) -> Result<(), ExecError> {
	for redirect in spec.redirects() {
		let fd = process.open(&redirect.target, redirect.typ).map_err(|e| ExecError::Open {
			path: redirect.target.display().to_string(),
			source: e,
		})?;
		let r = process.dup2(fd, redirect.typ.target_fd());
		process.close(fd)?;
		r?;
	}
	Ok(())
}
