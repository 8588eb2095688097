// src/exec/process.rs

//! Spawning `whitebox_tools` and relaying its output line by line.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::errors::{Result, RunnerError};
use crate::exec::args::CommandLine;
use crate::exec::cancel::CancelFlag;

pub const EXIT_SUCCESS: i32 = 0;
/// Returned by `run_tool` when the process could not be spawned or read.
pub const EXIT_LOCAL_ERROR: i32 = 1;
pub const EXIT_CANCELLED: i32 = 2;

/// Reported when the child was terminated by a signal and has no exit code.
const EXIT_NO_CODE: i32 = -1;

const LINE_BUFFER: usize = 64;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    Success,
    Failed(i32),
    Cancelled,
}

/// Result of one spawn-read-to-completion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// 0 on success, 2 when cancelled, otherwise the child's exit code.
    pub exit_code: i32,
    pub cancelled: bool,
    /// Every line read, in emission order, without line terminators.
    pub lines: Vec<String>,
}

impl Invocation {
    pub fn outcome(&self) -> ToolOutcome {
        if self.cancelled {
            ToolOutcome::Cancelled
        } else if self.exit_code == EXIT_SUCCESS {
            ToolOutcome::Success
        } else {
            ToolOutcome::Failed(self.exit_code)
        }
    }
}

/// Spawn `cmd` in `spawn_dir` and stream its merged stdout/stderr.
///
/// Each line is passed to `on_line` (trailing whitespace trimmed) unless
/// `silent` is set. When `cancel` is found set at a line boundary, the flag
/// is cleared, the child is killed and reading stops. All lines read are
/// kept in the returned [`Invocation`], including the one that observed the
/// cancellation. A failure while reading the output kills the child and is
/// returned as [`RunnerError::Io`].
pub async fn stream_output(
    cmd: &CommandLine,
    spawn_dir: &Path,
    cancel: &CancelFlag,
    silent: bool,
    on_line: &mut (dyn FnMut(&str) + Send),
) -> Result<Invocation> {
    info!(
        program = %cmd.program.display(),
        args = ?cmd.args,
        cwd = %spawn_dir.display(),
        "starting whitebox_tools process"
    );

    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .current_dir(spawn_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let (tx, mut rx) = mpsc::channel::<io::Result<String>>(LINE_BUFFER);
    let (mut child, forwarders) =
        spawn_merged(command, tx).map_err(|source| RunnerError::Spawn {
            program: cmd.program.clone(),
            source,
        })?;

    let mut lines = Vec::new();
    let relay = relay_lines(&mut rx, cancel, silent, on_line, &mut lines).await;

    match relay {
        Relay::Exhausted => {}
        Relay::Cancelled => {
            info!(
                program = %cmd.program.display(),
                lines_read = lines.len(),
                "cancellation requested; killing whitebox_tools process"
            );
            stop(&mut child, &forwarders).await;
            return Ok(Invocation {
                exit_code: EXIT_CANCELLED,
                cancelled: true,
                lines,
            });
        }
        Relay::Failed(e) => {
            warn!(
                program = %cmd.program.display(),
                lines_read = lines.len(),
                error = %e,
                "reading tool output failed; killing whitebox_tools process"
            );
            stop(&mut child, &forwarders).await;
            return Err(RunnerError::Io(e));
        }
    }

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(EXIT_NO_CODE);

    info!(
        program = %cmd.program.display(),
        exit_code,
        success = status.success(),
        lines_read = lines.len(),
        "whitebox_tools process exited"
    );

    Ok(Invocation {
        exit_code,
        cancelled: false,
        lines,
    })
}

/// Spawn with stdout and stderr sharing one pipe, so lines arrive in the
/// order the child wrote them.
#[cfg(unix)]
fn spawn_merged(
    mut command: Command,
    tx: mpsc::Sender<io::Result<String>>,
) -> io::Result<(Child, Vec<JoinHandle<()>>)> {
    use tokio::net::unix::pipe;

    let (writer, reader) = pipe::pipe()?;
    let stdout = writer.into_blocking_fd()?;
    let stderr = stdout.try_clone()?;
    command.stdout(stdout).stderr(stderr);

    let child = command.spawn()?;
    // `command` still owns the parent's copies of the write end; the reader
    // only sees EOF once they are closed.
    drop(command);

    Ok((child, vec![spawn_forwarder(reader, "output", tx)]))
}

/// Two pipes feeding one channel. Order is kept within each stream only.
#[cfg(not(unix))]
fn spawn_merged(
    mut command: Command,
    tx: mpsc::Sender<io::Result<String>>,
) -> io::Result<(Child, Vec<JoinHandle<()>>)> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn()?;

    let mut forwarders = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        forwarders.push(spawn_forwarder(stdout, "stdout", tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        forwarders.push(spawn_forwarder(stderr, "stderr", tx));
    }
    Ok((child, forwarders))
}

enum Relay {
    Exhausted,
    Cancelled,
    Failed(io::Error),
}

/// Consume the line channel until it closes, a cancellation is observed, or
/// a read error arrives. Lines read are appended to `lines`.
async fn relay_lines(
    rx: &mut mpsc::Receiver<io::Result<String>>,
    cancel: &CancelFlag,
    silent: bool,
    on_line: &mut (dyn FnMut(&str) + Send),
    lines: &mut Vec<String>,
) -> Relay {
    while let Some(next) = rx.recv().await {
        let line = match next {
            Ok(line) => line,
            Err(e) => return Relay::Failed(e),
        };

        if cancel.take() {
            lines.push(line);
            return Relay::Cancelled;
        }

        trace!(line = %line, "tool output");
        if !silent {
            on_line(line.trim_end());
        }
        lines.push(line);
    }
    Relay::Exhausted
}

async fn stop(child: &mut Child, forwarders: &[JoinHandle<()>]) {
    if let Err(e) = child.kill().await {
        warn!(error = %e, "failed to kill whitebox_tools process");
    }
    for forwarder in forwarders {
        forwarder.abort();
    }
}

/// Read `stream` line by line and push each line into `tx`. A read error is
/// forwarded once and ends the relay.
///
/// Bytes are decoded lossily so a stray non-UTF-8 path in the tool's output
/// does not stop the relay.
fn spawn_forwarder<R>(
    stream: R,
    source: &'static str,
    tx: mpsc::Sender<io::Result<String>>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(strip_line_ending(&buf)).into_owned();
                    if tx.send(Ok(line)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(source, error = %e, "output read failed");
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }

        debug!(source, "output forwarder finished");
    })
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
