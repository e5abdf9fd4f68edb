//! CLI interface for the ATS analyzer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const JOB_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "pdf"];
pub const RESUME_EXTENSIONS: &[&str] = &["json"];

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(about = "ATS keyword matching and scoring for structured resumes")]
#[command(long_about = "Score a JSON resume against a job description: extract the job's keywords, find them in the resume and suggest fixes per resume section")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to the resume (JSON)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to the job description (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Include every match result in the report
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory as <resume>_ats.<ext>
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List the keywords extracted from a job description
    Keywords {
        /// Path to the job description (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Print the parsed profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "analysis.preferred_weight")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    format.parse().map_err(|e: crate::error::AtsError| e.to_string())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
