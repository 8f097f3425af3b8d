//! Orientation detection via the Tesseract OSD mode.
//!
//! Runs `tesseract <image> - --psm 0` against a temporary PNG and parses
//! the `Rotate:` line from its output. The binary is an external,
//! optional dependency: any failure to run it (missing binary, non-zero
//! exit, timeout, unparseable output) is reported as
//! [`OrientationEstimate::Unavailable`] rather than an error, so the
//! pipeline can fall back to leaving the page orientation alone.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use image::GrayImage;
use tracing::debug;

use crate::core::errors::{NormalizeError, NormalizeResult, ProcessingStage};
use crate::domain::orientation::{CoarseRotation, OrientationEstimate, OrientationOracle};

const DEFAULT_BINARY: &str = "tesseract";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Oracle backed by the Tesseract binary's orientation-and-script
/// detection (`--psm 0`).
#[derive(Debug, Clone)]
pub struct TesseractOsd {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for TesseractOsd {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TesseractOsd {
    /// Creates an oracle using the `tesseract` binary from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific Tesseract binary instead of resolving from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Limits how long a single detection may run before the process is
    /// killed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run_osd(&self, image: &GrayImage) -> NormalizeResult<CoarseRotation> {
        let temp = tempfile::Builder::new()
            .prefix("docnorm-osd-")
            .suffix(".png")
            .tempfile()?;
        image
            .save(temp.path())
            .map_err(|e| NormalizeError::image_write(temp.path(), e))?;

        let mut child = Command::new(&self.binary)
            .arg(temp.path())
            .arg("-")
            .args(["--psm", "0"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Poll rather than block so a hung binary cannot stall the batch.
        let deadline = Instant::now() + self.timeout;
        loop {
            if child.try_wait()?.is_some() {
                break;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(NormalizeError::processing_error(
                    ProcessingStage::Rotation,
                    &format!("orientation detection timed out after {:?}", self.timeout),
                    std::io::Error::from(std::io::ErrorKind::TimedOut),
                ));
            }
            thread::sleep(POLL_INTERVAL);
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NormalizeError::invalid_input(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let degrees = parse_osd_rotation(&stdout).ok_or_else(|| {
            NormalizeError::invalid_input("no Rotate line in orientation detection output")
        })?;
        CoarseRotation::from_degrees(degrees).ok_or_else(|| {
            NormalizeError::invalid_input(format!(
                "orientation detection reported a non-quarter-turn angle: {degrees}"
            ))
        })
    }
}

impl OrientationOracle for TesseractOsd {
    fn detect(&self, image: &GrayImage) -> OrientationEstimate {
        match self.run_osd(image) {
            Ok(rotation) => OrientationEstimate::Detected(rotation),
            Err(e) => {
                debug!("orientation detection unavailable: {}", e);
                OrientationEstimate::Unavailable
            }
        }
    }
}

/// Extracts the rotation angle from OSD output.
///
/// Looks for a line of the form `Rotate: 90` and parses the integer.
fn parse_osd_rotation(output: &str) -> Option<i32> {
    output.lines().find_map(|line| {
        line.trim_start()
            .strip_prefix("Rotate:")
            .and_then(|rest| rest.trim().parse::<i32>().ok())
    })
}
