//! Text recognition.
//!
//! The calculator core only ever sees recognized text; this module is the
//! seam to whatever produces it.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Something that turns an image into text.
///
/// Output may be empty or garbled; the parser copes with both.
pub trait Recognizer {
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// Runs the `tesseract` command-line tool.
#[derive(Clone, Debug)]
pub struct TesseractCli {
    program: String,
    language: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: std::env::var("TESSERACT").unwrap_or_else(|_| "tesseract".to_string()),
            language: "eng".to_string(),
        }
    }
}

impl TesseractCli {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    fn args<'a>(&'a self, image: &'a Path) -> Vec<&'a OsStr> {
        vec![
            image.as_os_str(),
            OsStr::new("stdout"),
            OsStr::new("-l"),
            OsStr::new(&self.language),
            // Assume a single uniform block of text.
            OsStr::new("--psm"),
            OsStr::new("6"),
        ]
    }
}

impl Recognizer for TesseractCli {
    fn recognize(&self, image: &Path) -> Result<String> {
        if !image.is_file() {
            anyhow::bail!("Image not found: {}", image.display());
        }

        debug!(program = %self.program, image = %image.display(), "running OCR");
        let output = Command::new(&self.program)
            .args(self.args(image))
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(chars = text.len(), "recognized text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let ocr = TesseractCli::new("tesseract", "deu");
        let image = Path::new("/tmp/shot.png");
        let args: Vec<String> = ocr
            .args(image)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["/tmp/shot.png", "stdout", "-l", "deu", "--psm", "6"]);
    }

    #[test]
    fn test_missing_image() {
        let ocr = TesseractCli::default();
        assert!(ocr.recognize(Path::new("/definitely/not/here.png")).is_err());
    }

    #[test]
    fn test_missing_program() {
        let image = tempfile::NamedTempFile::new().unwrap();
        let ocr = TesseractCli::new("ocrcalc-no-such-program", "eng");
        let err = ocr.recognize(image.path()).unwrap_err();
        assert!(err.to_string().contains("ocrcalc-no-such-program"));
    }
}
