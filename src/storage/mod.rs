// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::{BatchStats, ItemRow, ResultTable};
use crate::report::Summary;
use crate::utils::error::StorageError;

/// Exported column headers, in order.
pub const COLUMNS: [&str; 8] = [
    "Póliza",
    "Cliente",
    "Vigencia",
    "Sección",
    "Ítem",
    "Valor Asegurado",
    "Prima Neta",
    "Placa",
];

/// Optional trailing column naming the source document.
pub const SOURCE_COLUMN: &str = "Archivo";

/// One row's cells, matching `COLUMNS`.
pub fn record(row: &ItemRow) -> [&str; 8] {
    [
        &row.header.policy,
        &row.header.client,
        &row.header.validity,
        &row.section,
        &row.item,
        &row.insured_value,
        &row.premium,
        &row.plate,
    ]
}

pub struct StorageManager {
    base_dir: PathBuf,
    include_source: bool,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P, include_source: bool) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path, include_source })
    }

    /// Writes the full, unpaginated table as a single-sheet CSV.
    pub fn save_table(&self, table: &ResultTable, name: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.csv", name));
        let mut writer = csv::Writer::from_path(&file_path)?;

        if self.include_source {
            writer.write_record(COLUMNS.iter().copied().chain([SOURCE_COLUMN]))?;
        } else {
            writer.write_record(COLUMNS)?;
        }

        for row in table.rows() {
            let cells = record(row);
            if self.include_source {
                writer.write_record(cells.iter().copied().chain([row.source.as_str()]))?;
            } else {
                writer.write_record(cells)?;
            }
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} rows to {}", table.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves the summary metrics and batch counters in JSON format
    pub fn save_summary(&self, summary: &Summary, stats: &BatchStats, name: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_resumen.json", name));

        let metadata = serde_json::json!({
            "summary": summary,
            "batch": stats,
            "columns": COLUMNS,
            "include_source": self.include_source,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved summary to {}", file_path.display());

        Ok(file_path)
    }
}
