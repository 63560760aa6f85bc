//! Subprocess line source
//!
//! Launches an interpreter against a script path and reads the child's
//! standard output line by line. Standard error is drained on a helper
//! thread and forwarded to the log at debug level; it is never parsed.
//!
//! A pipe read would block for as long as the child stays silent, which
//! would leave the reader worker unable to observe its stop flag. To keep
//! reads bounded like the serial variant's timeout, stdout is pumped on an
//! internal thread into a channel and [`LineSource::read_line`] polls that
//! channel with a short timeout. End of the child's output is terminal for
//! the stream and surfaces as a [`PlotterError::SourceRead`].

use crate::error::{PlotterError, Result};
use crate::source::LineSource;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

/// How long one `read_line` call waits for the child to produce output.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Line source reading a spawned interpreter's stdout
pub struct ProcessSource {
    interpreter: String,
    script: PathBuf,
    child: Option<Child>,
    lines: Option<Receiver<std::io::Result<String>>>,
}

impl ProcessSource {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            child: None,
            lines: None,
        }
    }

    fn script_name(&self) -> &str {
        self.script
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("script")
    }
}

fn pump_stdout(stdout: std::process::ChildStdout, tx: crossbeam_channel::Sender<std::io::Result<String>>) {
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
        // Dropping the sender signals EOF to the consumer.
    });
}

fn forward_stderr(stderr: std::process::ChildStderr, script: String) {
    std::thread::spawn(move || {
        for line in BufReader::new(stderr).lines() {
            match line {
                Ok(line) => tracing::debug!(script = %script, "stderr: {line}"),
                Err(_) => break,
            }
        }
    });
}

impl LineSource for ProcessSource {
    fn open(&mut self) -> Result<()> {
        if !Path::new(&self.script).exists() {
            return Err(PlotterError::Connection(format!(
                "script not found: {}",
                self.script.display()
            )));
        }

        let mut child = Command::new(&self.interpreter)
            .arg(&self.script)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| {
                PlotterError::Connection(format!(
                    "cannot launch {} {}: {e}",
                    self.interpreter,
                    self.script.display()
                ))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            PlotterError::Connection("child process has no stdout pipe".into())
        })?;
        if let Some(stderr) = child.stderr.take() {
            forward_stderr(stderr, self.script_name().to_string());
        }

        // Small bound: the unbounded queue lives on the reader side, not
        // here.
        let (tx, rx) = bounded(256);
        pump_stdout(stdout, tx);

        tracing::info!(script = %self.script.display(), interpreter = %self.interpreter,
            "subprocess launched");
        self.lines = Some(rx);
        self.child = Some(child);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let Some(lines) = self.lines.as_ref() else {
            return Err(PlotterError::SourceRead("subprocess is not running".into()));
        };

        match lines.recv_timeout(READ_TIMEOUT) {
            Ok(Ok(line)) => Ok(Some(line.trim_end().to_string())),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::InvalidData => Err(
                PlotterError::SourceRead(format!("invalid UTF-8 from {}: {e}", self.script_name())),
            ),
            Ok(Err(e)) => Err(PlotterError::SourceRead(format!(
                "read from {} failed: {e}",
                self.script_name()
            ))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(PlotterError::SourceRead(format!(
                "{} exited",
                self.script_name()
            ))),
        }
    }

    fn close(&mut self) {
        self.lines = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!("kill failed (already exited?): {e}");
            }
            let _ = child.wait();
            tracing::info!(script = %self.script.display(), "subprocess stopped");
        }
    }

    fn describe(&self) -> String {
        self.script_name().to_string()
    }
}

impl Drop for ProcessSource {
    fn drop(&mut self) {
        self.close();
    }
}
