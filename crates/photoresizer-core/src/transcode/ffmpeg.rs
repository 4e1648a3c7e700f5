use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::consts::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TOOL};
use crate::error::{ResizerError, Result};

use super::{CancelToken, TranscodeRequest, Transcoder};

/// Transcoder that shells out to an ffmpeg-compatible executable.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    poll_interval: Duration,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The full command line as it would be typed, for logs.
    pub fn command_line(&self, request: &TranscodeRequest) -> String {
        let mut line = self.program.display().to_string();
        for arg in request.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn spawn(&self, request: &TranscodeRequest) -> Result<Child> {
        Command::new(&self.program)
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ResizerError::ToolLaunch {
                program: self.program.clone(),
                source,
            })
    }

    /// Wait for the child, killing it if `cancel` fires first.
    fn wait(&self, child: &mut Child, cancel: &CancelToken) -> Result<ExitStatus> {
        loop {
            if cancel.is_cancelled() {
                if let Err(e) = child.kill() {
                    warn!(error = %e, "Failed to kill transcoder");
                }
                let _ = child.wait();
                return Err(ResizerError::Cancelled);
            }
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, request: &TranscodeRequest, cancel: &CancelToken) -> Result<PathBuf> {
        if cancel.is_cancelled() {
            return Err(ResizerError::Cancelled);
        }
        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!(command = %self.command_line(request), "Running transcoder");
        let mut child = self.spawn(request)?;

        // Drain stderr on its own thread so a chatty tool cannot fill the pipe
        // and stall.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        // After a cancel the reader is left detached: a grandchild of a wrapper
        // script may still hold stderr open after the child is killed.
        let status = self.wait(&mut child, cancel)?;
        let diagnostics = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            warn!(code = ?status.code(), "Transcoder failed");
            return Err(ResizerError::Transcode {
                code: status.code(),
                diagnostics: last_lines(&diagnostics, 5),
            });
        }

        info!(
            output = %request.output.display(),
            width = request.width,
            height = request.height,
            format = %request.format,
            "Transcode complete"
        );
        Ok(request.output.clone())
    }
}

/// Tail of the tool's log; ffmpeg prints its banner first and the error last.
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_lines_keeps_tail() {
        let text = "banner\n\nconfig\nInput #0\nerror: bad\n";
        assert_eq!(last_lines(text, 2), "Input #0\nerror: bad");
        assert_eq!(last_lines(text, 10), "banner\nconfig\nInput #0\nerror: bad");
        assert_eq!(last_lines("", 3), "");
    }
}
