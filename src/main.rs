use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medreport_lib::config::{self, ServiceConfig};
use medreport_lib::dataset::{DatasetLoader, DatasetSplit};
use medreport_lib::export::{write_export, ExportKind};
use medreport_lib::pipeline::diagnosis::{DiagnosisClient, DiagnosisOutcome, PatientInfo};
use medreport_lib::pipeline::extraction::{
    default_ocr_engine, extract_report_text, ExtractedReport, PdfTextExtractor, ReportSource,
};
use medreport_lib::pipeline::inference::{ConfiguredModels, ModelFactory};
use medreport_lib::pipeline::preprocess::{normalize_text, SectionMatchPolicy};
use medreport_lib::pipeline::summarization::SummarizationClient;
use medreport_lib::sample_pdf::generate_sample_report_pdf;

#[derive(Parser)]
#[command(name = "medreport")]
#[command(version, about = "Summarize medical reports and suggest candidate diagnoses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Bind address (overrides MEDREPORT_ADDR)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Summarize a report (PDF, image or text file)
    Summarize {
        file: PathBuf,
        /// Summarize each report section separately
        #[arg(long)]
        sections: bool,
        /// How repeated section matches combine: concatenate, first_match
        /// or last_match (overrides MEDREPORT_SECTION_POLICY)
        #[arg(long)]
        section_policy: Option<SectionMatchPolicy>,
        /// Write the summary to this file or directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Suggest candidate diagnoses for a report
    Diagnose {
        file: PathBuf,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        sex: Option<String>,
        #[arg(long)]
        chief_complaint: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
        #[arg(long)]
        current_medications: Option<String>,
        /// Write the diagnosis to this file or directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the text extracted from a report
    Extract { file: PathBuf },
    /// Write a sample medical report PDF
    SamplePdf { path: PathBuf },
    /// Print one formatted record from the reference dataset
    Dataset {
        #[arg(long, default_value = "dataset")]
        dir: PathBuf,
        #[arg(long, default_value = "train")]
        split: String,
        /// Record index within the split
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env();

    match cli.command {
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(medreport_lib::run_server(config))
        }
        Commands::Summarize {
            file,
            sections,
            section_policy,
            output,
        } => {
            if let Some(policy) = section_policy {
                config.section_policy = policy;
            }
            let report = read_report(&config, &file)?;
            let models = ConfiguredModels::new(config.clone().into());
            let model = models.summarizer()?;
            let client = SummarizationClient::from_config(model.as_ref(), &config);

            let outcome = if sections {
                client.summarize_report_sections(&report.text).outcome
            } else {
                client.summarize_report(&normalize_text(&report.text)).outcome
            };
            if let Some(reason) = outcome.failure_reason() {
                bail!("Summarization failed: {reason}");
            }
            emit(ExportKind::Summary, outcome.text(), output.as_deref())
        }
        Commands::Diagnose {
            file,
            age,
            sex,
            chief_complaint,
            medical_history,
            current_medications,
            output,
        } => {
            let report = read_report(&config, &file)?;
            let patient = PatientInfo {
                age,
                sex,
                chief_complaint,
                medical_history,
                current_medications,
            };
            let models = ConfiguredModels::new(config.clone().into());
            let model = models.diagnoser()?;
            let outcome = DiagnosisClient::new(model.as_ref())
                .generate_diagnosis(&normalize_text(&report.text), Some(&patient));

            match outcome {
                DiagnosisOutcome::Success(diagnosis) => {
                    emit(ExportKind::Diagnosis, &diagnosis.diagnosis, output.as_deref())
                }
                DiagnosisOutcome::Failed { error } => bail!(error),
            }
        }
        Commands::Extract { file } => {
            let report = read_report(&config, &file)?;
            if let Some(message) = &report.message {
                eprintln!("{message}");
            }
            println!("{}", report.text);
            Ok(())
        }
        Commands::SamplePdf { path } => {
            let bytes = generate_sample_report_pdf()?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Sample report written to {}", path.display());
            Ok(())
        }
        Commands::Dataset { dir, split, index } => {
            let split: DatasetSplit = split.parse()?;
            let reports = DatasetLoader::new(dir).load_formatted_reports(split)?;
            let Some(report) = reports.get(index) else {
                bail!("Split '{split}' has {} records, no index {index}", reports.len());
            };
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
    }
}

fn read_report(config: &ServiceConfig, file: &Path) -> anyhow::Result<ExtractedReport> {
    let source = ReportSource::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let ocr = match source {
        ReportSource::Image(_) => default_ocr_engine(&config.tessdata_dir),
        _ => None,
    };
    let report = extract_report_text(&source, &PdfTextExtractor, ocr.as_deref())?;
    Ok(report)
}

fn emit(kind: ExportKind, content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(target) => {
            let path = write_export(kind, content, target)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("Saved to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
