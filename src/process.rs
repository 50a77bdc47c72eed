//! Blocking child processes with an upper bound on run time
//!
//! Every external program (package client, installer, ssh, catalog bridge)
//! runs through [`run`], so no call can hang the engine forever.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, SyncError, remote};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of a finished child process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Short failure description: trimmed stderr, else stdout, else the status
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Run `cmd` to completion, feeding `stdin` and killing it after `timeout`
pub fn run(cmd: &mut Command, stdin: Option<&[u8]>, timeout: Duration) -> Result<ProcessOutput> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(program = %program, timeout_secs = timeout.as_secs(), "spawning process");

    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| remote::command_failed(&program, format!("failed to start: {e}")))?;

    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    if let (Some(input), Some(pipe)) = (stdin, child.stdin.take()) {
        spawn_writer(pipe, input.to_vec());
    }

    let status = wait_with_timeout(&mut child, timeout, &program)?;

    Ok(ProcessOutput {
        status,
        stdout: join_reader(stdout_handle),
        stderr: join_reader(stderr_handle),
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Duration, program: &str) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(program = %program, "process killed after timeout");
            return Err(SyncError::CommandTimedOut {
                program: program.to_string(),
                seconds: timeout.as_secs(),
            });
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Feed stdin off the waiting thread; the timeout must hold even if the
/// child never reads. Write errors surface through the exit status.
fn spawn_writer<W: Write + Send + 'static>(mut pipe: W, input: Vec<u8>) {
    thread::spawn(move || {
        let _ = pipe.write_all(&input);
    });
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
