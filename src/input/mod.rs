//! Input processing module
//! Reads job descriptions (TXT, MD, PDF) and JSON resumes from disk

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::InputManager;
