use std::convert::Infallible;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{IntoRawFd,RawFd};
use std::path::Path;

use nix::errno::Errno;
use nix::fcntl::{self,OFlag};
use nix::sys::signal::{self,SigHandler,Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{self,WaitStatus};
use nix::unistd::{self,ForkResult,Pid};
use tracing::{debug,trace};

use crate::error::ExecError;
use crate::types::RedirectType;

/// The process-level operations the executor and dispatcher are built from.
///
/// `Unix` performs them for real. Tests swap in `mock::Recorder`, which keeps a
/// log of every call and lets the caller script what `fork` returns.
pub trait Process {
	/// Returns `(read_end, write_end)`.
	fn pipe(&mut self) -> nix::Result<(RawFd, RawFd)>;
	fn fork(&mut self) -> nix::Result<ForkResult>;
	fn dup2(&mut self, fd: RawFd, target: RawFd) -> nix::Result<()>;
	fn close(&mut self, fd: RawFd) -> nix::Result<()>;
	fn open(&mut self, path: &Path, typ: RedirectType) -> nix::Result<RawFd>;
	/// Replaces the process image. Returns only on failure.
	fn exec(&mut self, path: &Path, argv: &[String]) -> Result<Infallible, ExecError>;
	fn wait(&mut self, pid: Pid) -> nix::Result<WaitStatus>;
	/// Terminates the calling process without running destructors or flushing stdio.
	fn exit(&mut self, status: u8);
}

pub trait WaitStatusExt {
	fn code(self) -> u8;
}

impl WaitStatusExt for WaitStatus {
	fn code(self) -> u8 {
		match self {
			WaitStatus::Exited(_, code) => code as u8,
			WaitStatus::Signaled(_, sig, _) => 128u8.wrapping_add(sig as u8),
			_ => 0,
		}
	}
}

pub struct Unix;

impl Process for Unix {
	fn pipe(&mut self) -> nix::Result<(RawFd, RawFd)> {
		let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC)?;
		let fds = (read.into_raw_fd(), write.into_raw_fd());
		trace!(read = fds.0, write = fds.1, "pipe");
		Ok(fds)
	}

	fn fork(&mut self) -> nix::Result<ForkResult> {
		// the interpreter never starts threads, so the child may do anything the parent could
		let r = unsafe { unistd::fork() }?;
		if let ForkResult::Parent { child } = r {
			debug!(pid = child.as_raw(), "forked");
		}
		Ok(r)
	}

	fn dup2(&mut self, fd: RawFd, target: RawFd) -> nix::Result<()> {
		unistd::dup2(fd, target)?;
		Ok(())
	}

	fn close(&mut self, fd: RawFd) -> nix::Result<()> {
		unistd::close(fd)
	}

	fn open(&mut self, path: &Path, typ: RedirectType) -> nix::Result<RawFd> {
		let flags = match typ {
			RedirectType::Input => OFlag::O_RDONLY,
			RedirectType::Output => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
		};
		fcntl::open(path, flags, Mode::from_bits_truncate(0o666))
	}

	fn exec(&mut self, path: &Path, argv: &[String]) -> Result<Infallible, ExecError> {
		let c_path = CString::new(path.as_os_str().as_bytes())?;
		let c_argv = argv.iter().map(|s| CString::new(s.as_bytes())).collect::<Result<Vec<CString>, _>>()?;
		debug!(path = %path.display(), ?argv, "exec");
		// the Rust runtime ignores SIGPIPE, and an ignored disposition survives exec
		unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }?;
		Ok(unistd::execv(&c_path, &c_argv)?)
	}

	fn wait(&mut self, pid: Pid) -> nix::Result<WaitStatus> {
		loop {
			match wait::waitpid(pid, None) {
				Err(Errno::EINTR) => continue,
				r => {
					debug!(pid = pid.as_raw(), status = ?r, "reaped");
					return r;
				},
			}
		}
	}

	fn exit(&mut self, status: u8) {
		unsafe { libc::_exit(status as libc::c_int) }
	}
}
