// src/lib.rs
//! Extraction of insured-item rows from insurance-policy documents.
//!
//! Page text goes through header, section, line-item and plate extraction
//! and comes out as one ordered [`pipeline::ResultTable`] per batch.
pub mod document;
pub mod extractors;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod utils;
