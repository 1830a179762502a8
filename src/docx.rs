use crate::{Error, Result};
use std::io;
use std::path::Path;
use std::process::Command;

/// A converter that turns an input document into a Markdown file on its own.
///
/// `.docx` files are handed to an implementation of this trait; the crate only reports
/// whether the conversion succeeded.
pub trait ExternalConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Runs `pandoc -s <input> -o <output>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: String,
}

impl Pandoc {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl ExternalConverter for Pandoc {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let result = Command::new(&self.program)
            .arg("-s")
            .arg(input)
            .arg("-o")
            .arg(output)
            .output();

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ToolUnavailable(self.program.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        if !output.status.success() {
            return Err(Error::ToolFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
