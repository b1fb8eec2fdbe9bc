mod builtin;
mod dispatch;
mod error;
mod global;
mod pipeline;
mod process;
mod redirect;
mod search;
mod tokenizer;
mod types;

use std::io;
use std::io::{BufRead,Write};

use argh::FromArgs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::dispatch::Dispatcher;
use crate::error::FatalError;
use crate::global::Context;
use crate::process::Unix;
use crate::search::PathResolver;

const LOG_ENV: &'static str = "PIPESH_LOG";

#[derive(FromArgs)]
/// A small command interpreter with redirection and pipelines.
struct Options {
	/// run a single command line and exit with its status
	#[argh(option, short = 'c')]
	command: Option<String>,

	/// never print the prompt
	#[argh(switch, short = 'q')]
	quiet: bool,

	/// log process creation to standard error
	#[argh(switch, short = 'v')]
	verbose: bool,
}

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_ansi(false)
		.without_time()
		.init();
}

fn prompt(ctx: &Context, quiet: bool) {
	if ctx.is_interactive && !quiet {
		let mut stdout = io::stdout();
		let _ = write!(stdout, "{}: ", ctx.line_num);
		let _ = stdout.flush();
	}
}

fn main() -> anyhow::Result<()> {
	let options: Options = argh::from_env();
	init_logging(options.verbose);

	let mut ctx = Context::new(PathResolver::from_env());
	let mut dispatcher = Dispatcher::new(Unix);
	debug!(terminal = ctx.terminal, interactive = ctx.is_interactive, "starting");

	if let Some(line) = options.command {
		let status = dispatcher.dispatch(&mut ctx, tokenizer::tokenize(line.as_bytes()), &mut io::stdout())?;
		let _ = io::stdout().flush();
		std::process::exit(status as i32);
	}

	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	prompt(&ctx, options.quiet);
	loop {
		let mut line: Vec<u8> = vec![];
		let n = stdin_locked.read_until(b'\n', &mut line).map_err(FatalError::Io)?;
		if n == 0 {
			break;
		}
		let tokens = tokenizer::tokenize(&line);
		let status = dispatcher.dispatch(&mut ctx, tokens, &mut io::stdout())?;
		debug!(line = ctx.line_num, status = status, "done");
		if ctx.should_exit {
			break;
		}
		ctx.line_num += 1;
		prompt(&ctx, options.quiet);
	}
	Ok(())
}
