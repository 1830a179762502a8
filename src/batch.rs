use crate::{ConvertedFile, Converter, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The result of one attempted file in a batch run.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<ConvertedFile>,
}

/// Per-file outcomes of [`convert_directory`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Inputs left alone because their output already existed and overwriting was disabled.
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// The Markdown path for `input` inside `output_dir`: the file stem plus `.md`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    output_dir.join(format!("{}.md", stem.to_string_lossy()))
}

/// Converts every file directly inside `input_dir` into `output_dir`.
///
/// Subdirectories are skipped, not recursed into. Files are processed in directory listing
/// order, one at a time; a failing file is recorded in the report and does not stop the run.
///
/// # Errors
///
/// Only directory-level failures are returned: creating `output_dir` or listing `input_dir`.
pub fn convert_directory(input_dir: &Path, output_dir: &Path, converter: &Converter) -> io::Result<BatchReport> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
        log::info!("Created output directory: {}", output_dir.display());
    }

    let mut report = BatchReport::default();

    for entry in fs::read_dir(input_dir)? {
        let input = entry?.path();
        if input.is_dir() {
            continue;
        }

        let output = output_path_for(&input, output_dir);
        if !converter.config().overwrite && output.exists() {
            log::info!("Skipping {}: {} already exists", input.display(), output.display());
            report.skipped.push(input);
            continue;
        }

        log::info!("Attempting to convert: {}", input.display());
        let result = converter.convert_file(&input, &output);
        if let Err(e) = &result {
            log::error!("Failed to convert '{}': {e}", input.display());
        }

        report.outcomes.push(FileOutcome { input, output, result });
    }

    log::info!("Converted {} file(s), {} failed", report.succeeded(), report.failed());
    Ok(report)
}
