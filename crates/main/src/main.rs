use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use genpdf::PaperSize;
use log::info;
use resume_pdf::templates::{self, DEFAULT_TEMPLATE_ID};
use resume_pdf::{LayoutSettings, ResumeError, ResumeExporter, ResumeRecord, StyleTable};

/// Renders resume records stored as JSON into paginated PDF files.
///
/// Set `RUST_LOG=debug` to trace page breaks.
#[derive(Parser)]
#[command(author, version, about = "Render structured resumes to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a resume record to `<name>_<template>.pdf`.
    Render {
        /// JSON file holding the resume record.
        input: PathBuf,

        /// Template id; see the `templates` command.
        #[arg(long, default_value = DEFAULT_TEMPLATE_ID)]
        template: String,

        /// JSON file overriding layout settings.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// JSON file replacing the style table.
        #[arg(long)]
        styles: Option<PathBuf>,

        /// Directory the PDF is written to.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Paper::A4)]
        paper: Paper,

        /// Add a PDF outline entry per section.
        #[cfg(feature = "bookmarks")]
        #[arg(long)]
        bookmarks: bool,
    },

    /// List the available templates.
    Templates,
}

#[derive(Clone, Copy, ValueEnum)]
enum Paper {
    A4,
    Letter,
    Legal,
}

impl From<Paper> for PaperSize {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::A4 => PaperSize::A4,
            Paper::Letter => PaperSize::Letter,
            Paper::Legal => PaperSize::Legal,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid {what}", path.display())]
    Parse {
        path: PathBuf,
        what: &'static str,
        source: Box<dyn Error>,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("export failed")]
    Export(#[from] ResumeError),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            template,
            settings,
            styles,
            out_dir,
            paper,
            #[cfg(feature = "bookmarks")]
            bookmarks,
        } => {
            let exporter = ResumeExporter::new()
                .with_paper_size(PaperSize::from(paper))
                .with_template(template);
            #[cfg(feature = "bookmarks")]
            let exporter = exporter.with_bookmarks(bookmarks);
            configure(exporter, settings.as_deref(), styles.as_deref())
                .and_then(|exporter| render(&exporter, &input, &out_dir))
        }
        Commands::Templates => {
            list_templates();
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn configure(
    mut exporter: ResumeExporter,
    settings: Option<&Path>,
    styles: Option<&Path>,
) -> Result<ResumeExporter, CliError> {
    if let Some(path) = settings {
        let parsed = LayoutSettings::from_json(&read(path)?).map_err(|err| CliError::Parse {
            path: path.to_path_buf(),
            what: "layout settings file",
            source: err.into(),
        })?;
        exporter = exporter.with_settings(parsed);
    }

    if let Some(path) = styles {
        let parsed = StyleTable::from_json(&read(path)?).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            what: "style table",
            source,
        })?;
        exporter = exporter.with_styles(parsed);
    }

    Ok(exporter)
}

fn render(exporter: &ResumeExporter, input: &Path, out_dir: &Path) -> Result<(), CliError> {
    let record = ResumeRecord::from_json(&read(input)?).map_err(|err| CliError::Parse {
        path: input.to_path_buf(),
        what: "resume record",
        source: err.into(),
    })?;

    let exported = exporter.export(&record)?;
    let path = out_dir.join(&exported.file_name);
    fs::write(&path, &exported.bytes).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;

    info!(
        "wrote {} using template `{}`",
        path.display(),
        exported.template
    );
    println!(
        "Wrote {} ({} page(s), {} bytes)",
        path.display(),
        exported.page_count,
        exported.bytes.len()
    );
    Ok(())
}

fn list_templates() {
    for template in templates::all() {
        let ats = if template.is_ats { "ATS" } else { "" };
        println!(
            "{:<14} {:<20} {:<14} {:<4} {}",
            template.id, template.name, template.category, ats, template.description
        );
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
