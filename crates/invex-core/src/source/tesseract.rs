//! OCR through an external Tesseract executable.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::SourceError;

use super::{require_text, Result, SourceOptions, SourceText, TextSource};

/// Nominal confidence for Tesseract plain-text output, which carries none.
const TESSERACT_CONFIDENCE: f32 = 0.85;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `tesseract <file> stdout -l <lang>` and reads its standard output.
#[derive(Debug, Clone)]
pub struct TesseractSource {
    binary: PathBuf,
}

impl TesseractSource {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn program(&self) -> String {
        self.binary.display().to_string()
    }

    fn command_error(&self, message: impl Into<String>) -> SourceError {
        SourceError::Command {
            program: self.program(),
            message: message.into(),
        }
    }

    /// Command line for one document.
    pub fn command(&self, path: &Path, options: &SourceOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&options.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for TesseractSource {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextSource for TesseractSource {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract(&self, path: &Path, options: &SourceOptions) -> Result<SourceText> {
        debug!("Running {} on {}", self.program(), path.display());

        let mut child = self
            .command(path, options)
            .spawn()
            .map_err(|e| self.command_error(e.to_string()))?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = wait_with_deadline(&mut child, options.timeout)
            .map_err(|e| self.command_error(e.to_string()))?;

        // the pipes may stay open in grandchildren; readers are left to finish on their own
        let Some(status) = status else {
            let limit = options.timeout.unwrap_or_default();
            warn!("{} killed after {:?} on {}", self.program(), limit, path.display());
            return Err(self.command_error(format!("timed out after {:?}", limit)));
        };

        let stdout = collect(stdout);
        if !status.success() {
            let stderr = collect(stderr);
            return Err(self.command_error(format!(
                "{}: {}",
                status,
                String::from_utf8_lossy(&stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        let text = require_text(self.name(), text, 0)?;

        Ok(SourceText::new(text, TESSERACT_CONFIDENCE)
            .with_metadata("method", "ocr")
            .with_metadata("engine", "tesseract")
            .with_metadata("language", options.language.as_str()))
    }
}

/// Read a pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Wait for `child`, killing it once `timeout` has passed.
///
/// Returns `None` when the child was killed.
fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<Option<ExitStatus>> {
    let Some(limit) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
