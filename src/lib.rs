mod batch;
mod constants;
mod container;
mod dispatch;
mod docx;
mod layout;
mod markdown_table;
mod parse_rels;
mod parse_xml;
mod parser_config;
mod pdf;
mod pptx;
mod slide;
mod types;

pub use batch::{convert_directory, output_path_for, BatchReport, FileOutcome};
pub use container::{PptxContainer, SlideIterator};
pub use dispatch::{ConvertedFile, Converter, DocumentKind};
pub use docx::{ExternalConverter, Pandoc};
pub use layout::{detect_tables, page_layout, FontEncodings, PageLayout, Rule, TextChunk};
pub use markdown_table::render_pipe_table;
pub use parser_config::{ConverterConfig, ConverterConfigBuilder};
pub use pdf::pdf_to_markdown;
pub use pptx::pptx_to_markdown;
pub use slide::Slide;
pub use types::*;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The file '{}' does not exist.", .0.display())]
    MissingInput(PathBuf),

    #[error("Unsupported file type '{0}'. Only .docx, .pdf, and .pptx are supported.")]
    UnsupportedType(String),

    #[error("{0} is not installed or not in your system's PATH. Please install it to convert .docx files.")]
    ToolUnavailable(String),

    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Presentation error: {0}")]
    Pptx(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], for callers that branch on outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    UnsupportedType,
    ToolUnavailable,
    ParseFailure,
    IoFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput(_) => ErrorKind::MissingFile,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::ToolUnavailable(_) | Error::ToolFailed { .. } => ErrorKind::ToolUnavailable,
            Error::Pdf(_) | Error::Zip(_) | Error::Xml(_) | Error::Utf8(_) | Error::Pptx(_) => {
                ErrorKind::ParseFailure
            }
            Error::Io(_) => ErrorKind::IoFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Joins Markdown fragments the way every converter writes them: separated by one blank line.
pub(crate) fn join_fragments(fragments: &[String]) -> String {
    fragments.join("\n\n")
}
