//! Keyword extraction, matching and scoring

pub mod text_processor;
pub mod dictionary;
pub mod jd_parser;
pub mod resume_index;
pub mod ats_matcher;
pub mod scoring;
pub mod recommendations;
pub mod session;
