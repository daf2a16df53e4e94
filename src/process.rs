//! Spawning external programs.
//!
//! [`Process`] launches a program, lets the caller wait for it and inspect its exit status,
//! and optionally talks to its standard streams. Spawning never fails outright: a program that
//! could not be started yields a handle that is not joinable and whose
//! [`last_error`](Process::last_error) reports the OS error.
//!
//! A handle owns its program. Dropping a handle that was never joined kills the program and
//! reaps it, so no exited child is left behind; join first to let it run to completion.
//!
//! # Examples
//!
//! ```no_run
//! use live_collection::process::Process;
//!
//! let mut ls = Process::spawn("ls", ["-al", "."], None);
//! assert!(ls.joinable());
//! ls.join()?;
//! assert_eq!(ls.exit_code(), Some(0));
//! # Ok::<(), live_collection::ProcessError>(())
//! ```

use std::ffi::{OsStr, OsString};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::error::{ProcessError, Result};

/// Configuration for a [`Process`], finished with [`spawn`](ProcessBuilder::spawn).
///
/// Standard input defaults to null and the output streams to inherited; each can be piped.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: OsString,
    args: Vec<OsString>,
    working_directory: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    stdin: bool,
    stdout: bool,
    stderr: bool,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            working_directory: None,
            env: Vec::new(),
            stdin: false,
            stdout: false,
            stderr: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_directory = Some(dir.as_ref().to_owned());
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    pub fn stdin_piped(mut self) -> Self {
        self.stdin = true;
        self
    }

    pub fn stdout_piped(mut self) -> Self {
        self.stdout = true;
        self
    }

    pub fn stderr_piped(mut self) -> Self {
        self.stderr = true;
        self
    }

    /// Starts the program, returning the spawn failure as an error.
    pub fn try_spawn(self) -> Result<Process> {
        let mut process = self.spawn();
        match process.last_error.take() {
            Some(source) => Err(ProcessError::Spawn {
                program: std::mem::take(&mut process.program),
                source,
            }),
            None => Ok(process),
        }
    }

    /// Starts the program. Failure is recorded in the returned handle.
    pub fn spawn(self) -> Process {
        let program = self.program.to_string_lossy().into_owned();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(if self.stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(if self.stdout { Stdio::piped() } else { Stdio::inherit() })
            .stderr(if self.stderr { Stdio::piped() } else { Stdio::inherit() });
        if let Some(dir) = &self.working_directory {
            command.current_dir(dir);
        }

        match command.spawn() {
            Ok(child) => {
                debug!(program = %program, pid = child.id(), "spawned process");
                Process {
                    program,
                    child: Some(child),
                    status: None,
                    last_error: None,
                }
            }
            Err(source) => {
                warn!(program = %program, error = %source, "failed to spawn process");
                Process {
                    program,
                    child: None,
                    status: None,
                    last_error: Some(source),
                }
            }
        }
    }
}

/// A spawned (or failed-to-spawn) external program.
///
/// Dropping a joinable process kills the program and waits for it.
#[derive(Debug)]
pub struct Process {
    program: String,
    child: Option<Child>,
    status: Option<ExitStatus>,
    last_error: Option<io::Error>,
}

impl Process {
    /// Starts `program` with `args`, optionally in `working_directory`.
    ///
    /// Standard input is null, output streams are inherited.
    pub fn spawn<I, S>(program: &str, args: I, working_directory: Option<&Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let builder = ProcessBuilder::new(program).args(args);
        match working_directory {
            Some(dir) => builder.current_dir(dir).spawn(),
            None => builder.spawn(),
        }
    }

    pub fn builder(program: impl AsRef<OsStr>) -> ProcessBuilder {
        ProcessBuilder::new(program)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the program is running or finished but not yet waited for.
    pub fn joinable(&self) -> bool {
        self.child.is_some()
    }

    /// OS process id while joinable.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Waits for the program to exit.
    ///
    /// Closes piped standard input first so programs reading it see end of file.
    pub fn join(&mut self) -> Result<ExitStatus> {
        let Some(mut child) = self.child.take() else {
            return Err(ProcessError::NotJoinable {
                program: self.program.clone(),
            });
        };

        drop(child.stdin.take());
        match child.wait() {
            Ok(status) => {
                debug!(program = %self.program, code = ?status.code(), "process exited");
                self.status = Some(status);
                Ok(status)
            }
            Err(source) => {
                let err = ProcessError::Wait {
                    program: self.program.clone(),
                    source: duplicate(&source),
                };
                self.last_error = Some(source);
                Err(err)
            }
        }
    }

    /// Exit code after a successful [`join`](Self::join).
    ///
    /// `None` before joining, or when the program was terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.and_then(|status| status.code())
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.status
    }

    /// Raw OS code of the last spawn or wait failure.
    pub fn last_error(&self) -> Option<i32> {
        self.last_error.as_ref().and_then(io::Error::raw_os_error)
    }

    pub fn last_error_kind(&self) -> Option<io::ErrorKind> {
        self.last_error.as_ref().map(io::Error::kind)
    }

    // -------------------------------------------------------------------------------------------------
    // Standard streams
    // -------------------------------------------------------------------------------------------------

    /// Writes `bytes` to the program's standard input.
    pub fn write_stdin(&mut self, bytes: &[u8]) -> Result<()> {
        let program = &self.program;
        let stdin = self
            .child
            .as_mut()
            .and_then(|child| child.stdin.as_mut())
            .ok_or_else(|| ProcessError::StreamUnavailable {
                program: program.clone(),
                stream: "stdin",
            })?;

        stdin
            .write_all(bytes)
            .and_then(|()| stdin.flush())
            .map_err(|source| ProcessError::Io {
                program: program.clone(),
                stream: "stdin",
                source,
            })
    }

    /// Closes standard input so the program sees end of file.
    pub fn close_stdin(&mut self) {
        if let Some(child) = self.child.as_mut() {
            drop(child.stdin.take());
        }
    }

    /// Reads standard output until the program closes it.
    pub fn read_stdout_to_string(&mut self) -> Result<String> {
        let program = &self.program;
        let stdout = self
            .child
            .as_mut()
            .and_then(|child| child.stdout.as_mut())
            .ok_or_else(|| ProcessError::StreamUnavailable {
                program: program.clone(),
                stream: "stdout",
            })?;
        read_to_string(stdout, program, "stdout")
    }

    /// Reads standard error until the program closes it.
    pub fn read_stderr_to_string(&mut self) -> Result<String> {
        let program = &self.program;
        let stderr = self
            .child
            .as_mut()
            .and_then(|child| child.stderr.as_mut())
            .ok_or_else(|| ProcessError::StreamUnavailable {
                program: program.clone(),
                stream: "stderr",
            })?;
        read_to_string(stderr, program, "stderr")
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(Some(status)) = child.try_wait() {
            debug!(program = %self.program, code = ?status.code(), "reaped unjoined process");
            return;
        }

        if let Err(error) = child.kill() {
            warn!(program = %self.program, error = %error, "failed to kill unjoined process");
        }
        match child.wait() {
            Ok(status) => {
                debug!(program = %self.program, code = ?status.code(), "killed unjoined process")
            }
            Err(error) => {
                warn!(program = %self.program, error = %error, "failed to reap unjoined process")
            }
        }
    }
}

/// Copy of `error` that keeps its OS code when it has one.
fn duplicate(error: &io::Error) -> io::Error {
    match error.raw_os_error() {
        Some(code) => io::Error::from_raw_os_error(code),
        None => io::Error::new(error.kind(), error.to_string()),
    }
}

fn read_to_string(reader: &mut impl Read, program: &str, stream: &'static str) -> Result<String> {
    let mut out = String::new();
    reader
        .read_to_string(&mut out)
        .map_err(|source| ProcessError::Io {
            program: program.to_string(),
            stream,
            source,
        })?;
    Ok(out)
}
