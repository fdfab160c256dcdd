// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use policy_extractor::document::{Document, PdfTextExtractor};
use policy_extractor::pipeline::config::{ExtractionConfig, HeadingSplit, PlateSource, DEFAULT_LOOKAHEAD_WINDOW};
use policy_extractor::pipeline::{ResultTable, RowAggregator};
use policy_extractor::report::{self, Summary};
use policy_extractor::storage::StorageManager;
use policy_extractor::utils::{self, AppError};

const EMPTY_RESULT_NOTICE: &str = "No se encontraron coincidencias en los documentos.";

/// Extracts policy item rows from insurance-policy PDFs into a spreadsheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Documents to process (.pdf, or .txt with already-extracted page text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for the exported table and summary
    #[arg(short, long, env = "POLICY_OUTPUT_DIR", default_value = "./output")]
    output_dir: PathBuf,

    /// Base file name of the export, written as <name>.csv (CSV, not Excel) plus <name>_resumen.json
    #[arg(long, default_value = "resultados")]
    output_name: String,

    /// Number of rows shown in the preview
    #[arg(long, default_value_t = 10)]
    preview_rows: usize,

    /// Lines scanned after an unpriced bullet for its amounts
    #[arg(long, env = "POLICY_LOOKAHEAD_WINDOW", default_value_t = DEFAULT_LOOKAHEAD_WINDOW)]
    lookahead_window: usize,

    /// Disable the multi-line amount fallback
    #[arg(long)]
    no_fallback: bool,

    /// End the amount lookahead at the next bullet line instead of scanning the whole window
    #[arg(long)]
    stop_at_next_bullet: bool,

    /// Treatment of a section heading that repeats later in a document
    #[arg(long, value_enum, default_value_t = HeadingSplit::FirstOccurrence)]
    heading_split: HeadingSplit,

    /// Text the plate code is read from
    #[arg(long, value_enum, default_value_t = PlateSource::Description)]
    plate_source: PlateSource,

    /// Add an "Archivo" column naming each row's source document
    #[arg(long)]
    include_source: bool,
}

impl Args {
    fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            multiline_fallback: !self.no_fallback,
            lookahead_window: self.lookahead_window,
            stop_at_next_bullet: self.stop_at_next_bullet,
            heading_split: self.heading_split,
            plate_source: self.plate_source,
        }
    }
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    if args.output_name.trim().is_empty() {
        return Err(AppError::Config("output name must not be empty".to_string()));
    }

    let config = args.extraction_config();
    tracing::debug!(
        "Extraction config: fallback={} lookahead={} stop_at_next_bullet={} heading_split={} plate_source={}",
        config.multiline_fallback,
        config.lookahead_window,
        config.stop_at_next_bullet,
        config.heading_split.as_str(),
        config.plate_source.as_str()
    );

    // 3. Load documents; a file that cannot be read contributes no rows
    let mut documents = Vec::with_capacity(args.files.len());
    let mut unreadable_files = 0;
    for path in &args.files {
        match Document::from_path(path) {
            Ok(document) => documents.push(document),
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                unreadable_files += 1;
            }
        }
    }

    // 4. Run the batch into a fresh table
    let aggregator = RowAggregator::new(PdfTextExtractor::new(), config);
    let mut table = ResultTable::new();
    let mut stats = aggregator.process_batch(&mut table, &documents);
    stats.documents += unreadable_files;
    stats.unreadable += unreadable_files;

    if table.is_empty() {
        println!("{}", EMPTY_RESULT_NOTICE);
        return Ok(());
    }

    // 5. Summary and preview
    let summary = Summary::from_table(&table);
    println!("Se extrajeron {} registros de {} documentos.\n", table.len(), stats.documents);
    println!("{}", report::render_summary(&summary));
    println!("Resultados (primeros {} registros)", args.preview_rows);
    print!("{}", report::render_preview(table.preview(args.preview_rows)));

    // 6. Export the full table
    let storage = StorageManager::new(&args.output_dir, args.include_source)?;
    let table_path = storage.save_table(&table, &args.output_name)?;
    storage.save_summary(&summary, &stats, &args.output_name)?;
    println!("\nTabla completa exportada a {}", table_path.display());

    tracing::info!("Processing finished. Rows: {}, unreadable documents: {}", stats.rows, stats.unreadable);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_output_name_help_mentions_csv() {
        let command = Args::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "output_name")
            .unwrap();
        assert!(arg.get_help().unwrap().to_string().contains("CSV"));
    }

    #[test]
    fn test_lookahead_scans_whole_window_unless_flagged() {
        let args = Args::try_parse_from(["policy_extractor", "a.pdf"]).unwrap();
        assert!(!args.extraction_config().stop_at_next_bullet);
        assert_eq!(args.extraction_config(), ExtractionConfig::default());

        let args = Args::try_parse_from(["policy_extractor", "a.pdf", "--stop-at-next-bullet"]).unwrap();
        assert!(args.extraction_config().stop_at_next_bullet);
    }
}
