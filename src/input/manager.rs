//! Input manager for job descriptions and resumes

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::resume::ResumeData;
use log::info;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a job description as plain text.
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        let file_type = self.detect_file_type(path)?;

        match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Json | FileType::Unknown => Err(AtsError::UnsupportedFormat(format!(
                "Job descriptions must be PDF, text or markdown: {}",
                path.display()
            ))),
        }
    }

    /// Read a resume exported as JSON.
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeData> {
        if self.detect_file_type(path)? != FileType::Json {
            return Err(AtsError::UnsupportedFormat(format!(
                "Resumes must be JSON: {}",
                path.display()
            )));
        }

        info!("Loading resume: {}", path.display());
        let content = fs::read_to_string(path).await?;
        let resume: ResumeData = serde_json::from_str(&content)?;
        Ok(resume)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        if path.extension().is_none() {
            return Err(AtsError::InvalidInput(format!(
                "File has no extension: {}",
                path.display()
            )));
        }

        Ok(FileType::from_path(path))
    }
}
