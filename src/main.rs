//! resume-ats: score a JSON resume against a job description

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use resume_ats::cli::{self, Cli, Commands, ConfigAction, JOB_EXTENSIONS, RESUME_EXTENSIONS};
use resume_ats::config::Config;
use resume_ats::error::AtsError;
use resume_ats::input::InputManager;
use resume_ats::output::formatter::{format_profile, report_path, save_report_to_file, ReportGenerator};
use resume_ats::output::AtsReport;
use resume_ats::processing::session::AnalysisSession;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            detailed,
            output,
            save,
        } => run_analyze(&config, resume, job, detailed, output, save).await,

        Commands::Keywords { job, json } => {
            cli::validate_file_extension(&job, JOB_EXTENSIONS)
                .map_err(|e| AtsError::InvalidInput(format!("Job description file: {}", e)))?;

            let text = InputManager::new()
                .load_job_description(&job)
                .await
                .with_context(|| format!("Failed to read job description {}", job.display()))?;

            let mut session = AnalysisSession::with_options(config.analysis_options())
                .context("Failed to build keyword dictionary")?;
            let profile = session.set_job_description(&text);

            if json {
                println!("{}", serde_json::to_string_pretty(profile)?);
            } else {
                print!("{}", format_profile(profile, config.output.color_output));
            }
            Ok(())
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("Configuration file: {}\n", config_path.display());
                    print!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize configuration")?
                    );
                }
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(config_path)?;
                    println!("Configuration reset to defaults");
                }
                Some(ConfigAction::Set { key, value }) => {
                    let mut config = config;
                    config.set_value(&key, &value)?;
                    config.save_to(config_path)?;
                    println!("Set {} = {}", key, value);
                }
            }
            Ok(())
        }
    }
}

async fn run_analyze(
    config: &Config,
    resume: PathBuf,
    job: PathBuf,
    detailed: bool,
    output: Option<String>,
    save: Option<PathBuf>,
) -> Result<()> {
    info!("Starting ATS analysis");

    cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
        .map_err(|e| AtsError::InvalidInput(format!("Resume file: {}", e)))?;
    cli::validate_file_extension(&job, JOB_EXTENSIONS)
        .map_err(|e| AtsError::InvalidInput(format!("Job description file: {}", e)))?;

    let output_format = match output {
        Some(format) => cli::parse_output_format(&format).map_err(AtsError::InvalidInput)?,
        None => config.output.format,
    };

    let start_time = Instant::now();
    let input = InputManager::new();
    let job_text = input
        .load_job_description(&job)
        .await
        .with_context(|| format!("Failed to read job description {}", job.display()))?;
    let resume_data = input
        .load_resume(&resume)
        .await
        .with_context(|| format!("Failed to read resume {}", resume.display()))?;

    let mut session = AnalysisSession::with_options(config.analysis_options())
        .context("Failed to build keyword dictionary")?;
    session.set_job_description(&job_text);
    if !session.has_job_description() {
        info!("No known keywords in {}; reporting structure checks only", job.display());
    }
    let results = session.analyze(&resume_data).clone();
    let fragment_count = session.fragments().len();

    let report = AtsReport::new(
        results,
        &resume.display().to_string(),
        &job.display().to_string(),
        fragment_count,
        start_time.elapsed().as_millis() as u64,
    );

    let generator = ReportGenerator::with_options(
        config.output.color_output && save.is_none(),
        detailed || config.output.detailed,
    );
    let content = generator.generate_report(&report, output_format)?;

    match save {
        Some(save) => {
            let path = report_path(&save, output_format, &resume);
            save_report_to_file(&content, &path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!("Report saved to {}", path.display());
        }
        None => print!("{}", content),
    }

    info!("Analysis complete: {}% overall", report.summary.overall_score);
    Ok(())
}
