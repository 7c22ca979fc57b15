//! Running tool chains and relaying their output.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::ChildStderr;
use std::process::ChildStdout;
use std::process::Command;
use std::process::Stdio;
use std::thread;

use thiserror::Error;

use super::chain::Stage;
use super::chain::ToolChain;
use crate::ArchiveError;
use crate::report::Reporter;

/// Failure of a tool chain, before it is attributed to an operation.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// A program could not be located or started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Rendered chain.
        command: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A stage exited unsuccessfully.
    #[error("{command} failed")]
    Exit {
        /// Rendered chain.
        command: String,
        /// Exit code, `None` if the stage was killed by a signal.
        code: Option<i32>,
    },

    /// Relaying output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InvokeError {
    /// Converts into an `ArchiveError`, attributing exit failures with
    /// `on_exit(command, code)`.
    pub fn into_archive_error(
        self,
        on_exit: impl FnOnce(String, Option<i32>) -> ArchiveError,
    ) -> ArchiveError {
        match self {
            Self::Spawn { command, source } => ArchiveError::ProcessSpawnFailed { command, source },
            Self::Exit { command, code } => on_exit(command, code),
            Self::Io(e) => ArchiveError::Io(e),
        }
    }
}

/// Runs tool chains, relaying their output to a [`Reporter`].
///
/// Standard input of the first stage is the null device unless the chain
/// reads from a file, so tools never wait for a keyboard answer.
#[derive(Clone, Copy)]
pub struct ToolInvoker<'r> {
    reporter: &'r dyn Reporter,
}

impl<'r> ToolInvoker<'r> {
    /// Creates an invoker relaying to `reporter`.
    #[must_use]
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Returns the reporter receiving relayed output.
    #[must_use]
    pub fn reporter(&self) -> &'r dyn Reporter {
        self.reporter
    }

    /// Runs a chain, mirroring its standard output to the reporter.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::Spawn` if a stage cannot be started,
    /// `InvokeError::Exit` if any stage exits unsuccessfully.
    pub fn run(&self, chain: &ToolChain) -> Result<(), InvokeError> {
        let reporter = self.reporter;
        self.run_with(chain, |line| reporter.on_tool_stdout(line))
    }

    /// Runs a chain, handing each standard output line to `on_line`.
    ///
    /// Standard error of every stage is relayed to the reporter while the
    /// standard output is consumed, so no stage can stall on a full pipe.
    /// Output redirected into a file is not seen by `on_line`.
    ///
    /// # Errors
    ///
    /// Same as [`ToolInvoker::run`].
    pub fn run_with<F>(&self, chain: &ToolChain, mut on_line: F) -> Result<(), InvokeError>
    where
        F: FnMut(&str),
    {
        let command = chain.to_string();
        self.reporter.on_command(&command);

        let mut children = Vec::with_capacity(chain.stages().len());
        let mut stderrs = Vec::with_capacity(chain.stages().len());
        let stdout = match spawn_all(chain, &mut children, &mut stderrs) {
            Ok(stdout) => stdout,
            Err(source) => {
                kill_all(&mut children);
                return Err(InvokeError::Spawn { command, source });
            }
        };

        let reporter = self.reporter;
        let drained = thread::scope(|scope| {
            let relays: Vec<_> = stderrs
                .into_iter()
                .map(|stderr| {
                    scope.spawn(move || for_each_line(stderr, |line| reporter.on_tool_stderr(line)))
                })
                .collect();

            let mut result = match stdout {
                Some(stdout) => for_each_line(stdout, &mut on_line),
                None => Ok(()),
            };
            if result.is_err() {
                kill_all(&mut children);
            }
            for relay in relays {
                let relayed = relay
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                if result.is_ok() {
                    result = relayed;
                }
            }
            result
        });

        let mut failure: Option<Option<i32>> = None;
        for child in &mut children {
            let status = child.wait()?;
            if !status.success() {
                match failure {
                    None | Some(None) => failure = Some(status.code()),
                    Some(Some(_)) => {}
                }
            }
        }
        drained?;

        match failure {
            Some(code) => Err(InvokeError::Exit { command, code }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ToolInvoker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker").finish_non_exhaustive()
    }
}

fn spawn_all(
    chain: &ToolChain,
    children: &mut Vec<Child>,
    stderrs: &mut Vec<ChildStderr>,
) -> io::Result<Option<ChildStdout>> {
    let last = chain.stages().len() - 1;
    let mut upstream: Option<ChildStdout> = None;

    for (i, stage) in chain.stages().iter().enumerate() {
        let stdin = match upstream.take() {
            Some(out) => Stdio::from(out),
            None => match chain.input() {
                Some(path) => Stdio::from(File::open(locate(chain, path))?),
                None => Stdio::null(),
            },
        };
        let stdout = match chain.output() {
            Some(path) if i == last => Stdio::from(File::create(locate(chain, path))?),
            _ => Stdio::piped(),
        };

        let mut child = spawn_stage(stage, chain.work_dir(), stdin, stdout)?;
        if let Some(stderr) = child.stderr.take() {
            stderrs.push(stderr);
        }
        upstream = child.stdout.take();
        children.push(child);
    }

    Ok(upstream)
}

fn spawn_stage(
    stage: &Stage,
    work_dir: Option<&Path>,
    stdin: Stdio,
    stdout: Stdio,
) -> io::Result<Child> {
    let program = which::which(stage.program())
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("{}: {e}", stage.program())))?;

    let mut command = Command::new(program);
    command
        .args(stage.arguments())
        .stdin(stdin)
        .stdout(stdout)
        .stderr(Stdio::piped());
    if let Some(dir) = work_dir {
        command.current_dir(dir);
    }
    command.spawn()
}

fn locate(chain: &ToolChain, path: &Path) -> PathBuf {
    match chain.work_dir() {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

fn kill_all(children: &mut [Child]) {
    for child in children {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn for_each_line<R: Read>(reader: R, mut on_line: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        on_line(&String::from_utf8_lossy(&buf));
    }
}
