use std::io;
use std::io::Write;

use nix::unistd;
use tracing::debug;

use crate::global::Context;

pub type Builtin = fn(&mut Context, &[String], &mut dyn Write) -> u8;

pub struct BuiltinDesc {
	pub name: &'static str,
	pub doc: &'static str,
	pub fun: Builtin,
}

pub const BUILTINS: &'static [BuiltinDesc] = &[
	BuiltinDesc { name: "?", doc: "show this help menu", fun: builtin_help },
	BuiltinDesc { name: "exit", doc: "exit the command shell", fun: builtin_exit },
	BuiltinDesc { name: "pwd", doc: "get current working directory", fun: builtin_pwd },
	BuiltinDesc { name: "cd", doc: "change current working directory", fun: builtin_cd },
];

pub fn builtin_help(_: &mut Context, _: &[String], out: &mut dyn Write) -> u8 {
	for b in BUILTINS {
		if writeln!(out, "{} - {}", b.name, b.doc).is_err() {
			return 1;
		}
	}
	0
}

pub fn builtin_exit(ctx: &mut Context, _: &[String], _: &mut dyn Write) -> u8 {
	ctx.should_exit = true;
	0
}

pub fn builtin_pwd(_: &mut Context, _: &[String], out: &mut dyn Write) -> u8 {
	match unistd::getcwd() {
		Ok(dir) => match writeln!(out, "{}", dir.display()) {
			Ok(()) => 0,
			Err(_) => 1,
		},
		Err(e) => {
			let _ = writeln!(&mut io::stderr(), "pwd: {}", e);
			1
		},
	}
}

pub fn builtin_cd(_: &mut Context, args: &[String], _: &mut dyn Write) -> u8 {
	let dir = match args.first() {
		Some(dir) => dir,
		None => {
			let _ = writeln!(&mut io::stderr(), "missing arguments: cd PATH_NAME");
			return 1;
		},
	};
	match unistd::chdir(dir.as_str()) {
		Ok(()) => {
			debug!(dir = dir.as_str(), "changed directory");
			0
		},
		Err(e) => {
			let _ = writeln!(&mut io::stderr(), "cd: {}: {}", dir, e);
			1
		},
	}
}

pub fn match_builtin(name: &str) -> Option<Builtin> {
	BUILTINS.iter().find(|b| b.name == name).map(|b| b.fun)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::search::PathResolver;

	fn ctx() -> Context {
		Context::new(PathResolver::new(None))
	}

	#[test]
	fn table_lookup() {
		for name in &["?", "exit", "pwd", "cd"] {
			assert!(match_builtin(name).is_some(), "{}", name);
		}
		assert!(match_builtin("ls").is_none());
		assert!(match_builtin("CD").is_none());
	}

	#[test]
	fn help_lists_table_in_order() {
		let mut out = vec![];
		assert_eq!(builtin_help(&mut ctx(), &[], &mut out), 0);
		assert_eq!(String::from_utf8(out).unwrap(), "? - show this help menu\n\
			exit - exit the command shell\n\
			pwd - get current working directory\n\
			cd - change current working directory\n");
	}

	#[test]
	fn exit_sets_the_flag() {
		let mut c = ctx();
		assert_eq!(builtin_exit(&mut c, &[], &mut io::sink()), 0);
		assert!(c.should_exit);
	}

	#[test]
	fn pwd_prints_a_line() {
		let mut out = vec![];
		assert_eq!(builtin_pwd(&mut ctx(), &[], &mut out), 0);
		let s = String::from_utf8(out).unwrap();
		assert!(s.starts_with('/'));
		assert!(s.ends_with('\n'));
	}

	#[test]
	fn cd_without_argument_fails() {
		assert_eq!(builtin_cd(&mut ctx(), &[], &mut io::sink()), 1);
	}

	#[test]
	fn cd_to_missing_directory_fails() {
		let before = unistd::getcwd().unwrap();
		assert_eq!(builtin_cd(&mut ctx(), &["/no/such/dir/for/pipesh".to_string()], &mut io::sink()), 1);
		assert_eq!(unistd::getcwd().unwrap(), before);
	}
}
