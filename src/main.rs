use anyhow::{Context, Result};
use clap::Parser;
use office_to_md::{convert_directory, output_path_for, Converter, ConverterConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert .docx, .pdf and .pptx files into Markdown.
#[derive(Debug, Parser)]
#[command(name = "office-to-md", version, about)]
struct Cli {
    /// Directory holding the documents to convert
    #[arg(default_value = "pre_doc")]
    input_dir: PathBuf,

    /// Directory the Markdown files are written to
    #[arg(default_value = "post_doc")]
    output_dir: PathBuf,

    /// Convert a single file instead of a directory
    #[arg(long, value_name = "INPUT", conflicts_with = "input_dir")]
    file: Option<PathBuf>,

    /// Output path for --file (defaults to the input name with a .md extension)
    #[arg(short, long, value_name = "OUTPUT", requires = "file")]
    output: Option<PathBuf>,

    /// Program used to convert .docx files
    #[arg(long, value_name = "PROGRAM", default_value = "pandoc")]
    pandoc: String,

    /// Do not append detected tables to PDF output
    #[arg(long)]
    no_tables: bool,

    /// Skip files whose Markdown output already exists
    #[arg(long)]
    no_overwrite: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,lopdf=warn"))
        .target(env_logger::Target::Stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every attempted conversion succeeded.
fn run(cli: Cli) -> Result<bool> {
    let config = ConverterConfig::builder()
        .pandoc_program(cli.pandoc)
        .detect_tables(!cli.no_tables)
        .overwrite(!cli.no_overwrite)
        .build();
    let converter = Converter::new(config);

    if let Some(input) = cli.file {
        let parent = input.parent().map(PathBuf::from).unwrap_or_default();
        let output = cli.output.unwrap_or_else(|| output_path_for(&input, &parent));
        return match converter.convert_file(&input, &output) {
            Ok(_) => Ok(true),
            Err(e) => {
                log::error!("{e}");
                Ok(false)
            }
        };
    }

    let report = convert_directory(&cli.input_dir, &cli.output_dir, &converter).with_context(|| {
        format!(
            "failed to convert '{}' into '{}'",
            cli.input_dir.display(),
            cli.output_dir.display()
        )
    })?;

    Ok(report.is_success())
}
