use crate::docx::{ExternalConverter, Pandoc};
use crate::{pdf, pptx, ConverterConfig, Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// The document types the dispatcher knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Docx,
    Pdf,
    Pptx,
}

impl DocumentKind {
    /// Maps a lowercase extension (without the dot) to a document kind.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "docx" => Some(DocumentKind::Docx),
            "pdf" => Some(DocumentKind::Pdf),
            "pptx" => Some(DocumentKind::Pptx),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Docx => "DOCX",
            DocumentKind::Pdf => "PDF",
            DocumentKind::Pptx => "PPTX",
        };
        f.write_str(name)
    }
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: DocumentKind,
}

/// Routes files to the matching converter.
pub struct Converter {
    config: ConverterConfig,
    docx_backend: Box<dyn ExternalConverter>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        let docx_backend = Box::new(Pandoc::new(config.pandoc_program.clone()));
        Self { config, docx_backend }
    }

    /// Replaces the program used for `.docx` files.
    pub fn with_docx_backend(mut self, backend: impl ExternalConverter + 'static) -> Self {
        self.docx_backend = Box::new(backend);
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts `input` into Markdown at `output`, choosing the converter by extension.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingInput`] if `input` does not exist; nothing is converted.
    /// - [`Error::UnsupportedType`] for any extension other than `.docx`, `.pdf` or `.pptx`.
    /// - Any error of the selected converter. No partial output is written by the PDF and
    ///   PPTX converters.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConvertedFile> {
        if !input.exists() {
            return Err(Error::MissingInput(input.to_path_buf()));
        }

        let extension = input
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let kind = DocumentKind::from_extension(extension.trim_start_matches('.'))
            .ok_or_else(|| Error::UnsupportedType(extension.clone()))?;

        match kind {
            DocumentKind::Docx => self.docx_backend.convert(input, output)?,
            DocumentKind::Pdf => pdf::pdf_to_markdown(input, output, &self.config)?,
            DocumentKind::Pptx => pptx::pptx_to_markdown(input, output)?,
        }

        log::info!("Successfully converted '{}' to '{}'.", input.display(), output.display());

        Ok(ConvertedFile {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            kind,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::fs;

    #[test]
    fn test_from_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("pptx"), Some(DocumentKind::Pptx));
        assert_eq!(DocumentKind::from_extension("docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("doc"), None);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing.md");

        let err = Converter::default()
            .convert_file(&dir.path().join("missing.pdf"), &output)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingFile);
        assert!(!output.exists());
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let output = dir.path().join("notes.md");
        fs::write(&input, "hello").unwrap();

        let err = Converter::default().convert_file(&input, &output).unwrap_err();

        assert!(matches!(err, Error::UnsupportedType(ref ext) if ext == ".txt"));
        assert!(!output.exists());
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("SLIDES.PPTX");
        let output = dir.path().join("SLIDES.md");
        fs::write(&input, "not a zip").unwrap();

        // routed to the PPTX converter, which rejects the content
        let err = Converter::default().convert_file(&input, &output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(!output.exists());
    }
}
