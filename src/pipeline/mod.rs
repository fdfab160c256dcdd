// src/pipeline/mod.rs
pub mod config;

use serde::Serialize;

use crate::document::{Document, TextExtractor};
use crate::extractors::{extract_header, extract_plate, HeaderFields, ItemExtractor, SectionSplitter};
use config::{ExtractionConfig, PlateSource};

/// One output record: the document's header fields copied onto every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub source: String,
    pub header: HeaderFields,
    pub section: String,
    pub item: String,
    pub insured_value: String,
    pub premium: String,
    pub plate: String,
}

/// Ordered, append-only rows of one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<ItemRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ItemRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ItemRow] {
        &self.rows
    }

    /// The first `limit` rows, for on-screen inspection.
    pub fn preview(&self, limit: usize) -> &[ItemRow] {
        &self.rows[..limit.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counters for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub documents: usize,
    pub unreadable: usize,
    pub without_sections: usize,
    pub sections: usize,
    pub rows: usize,
}

/// Turns a batch of documents into a single ResultTable.
pub struct RowAggregator<E> {
    extractor: E,
    config: ExtractionConfig,
}

impl<E: TextExtractor> RowAggregator<E> {
    pub fn new(extractor: E, config: ExtractionConfig) -> Self {
        Self { extractor, config }
    }

    pub fn aggregate(&self, documents: &[Document]) -> ResultTable {
        self.run(documents).0
    }

    /// Replaces the contents of an externally owned table with a fresh
    /// extraction of `documents`. Previous rows are discarded, not merged.
    pub fn process_batch(&self, table: &mut ResultTable, documents: &[Document]) -> BatchStats {
        let (fresh, stats) = self.run(documents);
        *table = fresh;
        stats
    }

    pub fn run(&self, documents: &[Document]) -> (ResultTable, BatchStats) {
        tracing::info!("Processing batch of {} documents", documents.len());
        let mut table = ResultTable::new();
        let mut stats = BatchStats {
            documents: documents.len(),
            ..BatchStats::default()
        };

        for document in documents {
            let text = match self.extractor.extract_text(document) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", document.name, e);
                    stats.unreadable += 1;
                    continue;
                }
            };
            let before = table.len();
            self.append_document(&document.name, &text, &mut table, &mut stats);
            tracing::info!("{}: {} rows", document.name, table.len() - before);
        }

        stats.rows = table.len();
        tracing::info!(
            "Batch finished: {} rows from {} documents ({} unreadable, {} without sections)",
            stats.rows,
            stats.documents,
            stats.unreadable,
            stats.without_sections
        );
        (table, stats)
    }

    /// Appends the rows of one document's text, in section then line order.
    pub fn append_document(&self, name: &str, text: &str, table: &mut ResultTable, stats: &mut BatchStats) {
        let header = extract_header(text);
        let sections = SectionSplitter::new(self.config.heading_split).split(text);
        if sections.is_empty() {
            tracing::warn!("{}: no section headings found", name);
            stats.without_sections += 1;
            return;
        }
        stats.sections += sections.len();

        let items = ItemExtractor::new(&self.config);
        for section in &sections {
            for item in items.extract(section.label, section.content) {
                let plate = match self.config.plate_source {
                    PlateSource::Description => extract_plate(&item.description),
                    PlateSource::ItemBlock => extract_plate(&item.block),
                };
                table.push(ItemRow {
                    source: name.to_string(),
                    header: header.clone(),
                    section: section.label.to_string(),
                    item: item.description,
                    insured_value: item.value,
                    premium: item.premium,
                    plate,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::config::HeadingSplit;
    use super::*;
    use crate::extractors::NO_POLICY;
    use crate::utils::error::DocumentError;

    /// Treats document bytes as UTF-8 text; an empty document is unreadable.
    struct InMemory;

    impl TextExtractor for InMemory {
        fn extract_text(&self, document: &Document) -> Result<String, DocumentError> {
            if document.bytes.is_empty() {
                return Err(DocumentError::Empty(document.name.clone()));
            }
            Ok(String::from_utf8_lossy(&document.bytes).into_owned())
        }
    }

    fn doc(name: &str, text: &str) -> Document {
        Document::new(name, text.as_bytes().to_vec())
    }

    fn aggregator(config: ExtractionConfig) -> RowAggregator<InMemory> {
        RowAggregator::new(InMemory, config)
    }

    #[test]
    fn test_single_document_scenario() {
        let text = "Póliza 12345\nCliente ACME CORP\nSECCION: 100 VEHICULOS\n1. Auto sedan  1,200.00 45.00\n";
        let table = aggregator(ExtractionConfig::default()).aggregate(&[doc("a.txt", text)]);
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.source, "a.txt");
        assert_eq!(row.header.policy, "12345");
        assert_eq!(row.header.client, "ACME CORP");
        assert_eq!(row.section, "SECCION: 100 VEHICULOS");
        assert_eq!(row.item, "Auto sedan");
        assert_eq!(row.insured_value, "1,200.00");
        assert_eq!(row.premium, "45.00");
        assert_eq!(row.plate, "");
    }

    #[test]
    fn test_plate_source_choice() {
        let text = "Póliza 7\nSECCION: 100 VEHICULOS\n1. Camioneta\nPLACA: XYZ123\n800.00 30.00\n";

        let table = aggregator(ExtractionConfig::default()).aggregate(&[doc("a.txt", text)]);
        assert_eq!(table.rows()[0].item, "1. Camioneta");
        assert_eq!(table.rows()[0].insured_value, "800.00");
        assert_eq!(table.rows()[0].premium, "30.00");
        assert_eq!(table.rows()[0].plate, "");

        let config = ExtractionConfig { plate_source: PlateSource::ItemBlock, ..ExtractionConfig::default() };
        let table = aggregator(config).aggregate(&[doc("a.txt", text)]);
        assert_eq!(table.rows()[0].plate, "XYZ123");
    }

    #[test]
    fn test_plate_from_description() {
        let text = "SECCION: 100 VEHICULOS\n1. Auto PLACA: ABC123 2019 15,000.00 300.00\n";
        let table = aggregator(ExtractionConfig::default()).aggregate(&[doc("a.txt", text)]);
        assert_eq!(table.rows()[0].plate, "ABC123");
        assert_eq!(table.rows()[0].header.policy, NO_POLICY);
    }

    #[test]
    fn test_order_and_unreadable_documents() {
        let first = "Póliza 1\nSECCION: 100 AUTOS\n1. A 1.00 0.10\n2. B 2.00 0.20\nSECCION: 200 VIDA\nA. C 3.00 0.30\n";
        let second = "Póliza 2\nSECCION: 100 AUTOS\n1. D 4.00 0.40\n";
        let docs = vec![doc("1.txt", first), doc("roto.pdf", ""), doc("2.txt", second), doc("1.txt", first)];

        let (table, stats) = aggregator(ExtractionConfig::default()).run(&docs);
        let items: Vec<&str> = table.rows().iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["A", "B", "C", "D", "A", "B", "C"]);
        assert_eq!(table.rows()[2].section, "SECCION: 200 VIDA");
        assert_eq!(table.rows()[3].header.policy, "2");
        assert_eq!(
            stats,
            BatchStats { documents: 4, unreadable: 1, without_sections: 0, sections: 5, rows: 7 }
        );
    }

    #[test]
    fn test_document_without_sections_yields_no_rows() {
        let (table, stats) = aggregator(ExtractionConfig::default())
            .run(&[doc("a.txt", "Póliza 55\nCliente X\n1. Auto 10.00 1.00\n")]);
        assert!(table.is_empty());
        assert_eq!(stats.without_sections, 1);
        assert_eq!(extract_header("Póliza 55\nCliente X\n").policy, "55");
    }

    #[test]
    fn test_repeated_heading_policy_changes_labels_only() {
        let text = "SECCION: 100 AUTOS\n1. A 1.00 1.00\nSECCION: 200 VIDA\n2. B 2.00 2.00\nSECCION: 100 AUTOS\n3. C 3.00 3.00\n";
        let first = aggregator(ExtractionConfig::default()).aggregate(&[doc("a.txt", text)]);
        let ordered = aggregator(ExtractionConfig {
            heading_split: HeadingSplit::OccurrenceOrder,
            ..ExtractionConfig::default()
        })
        .aggregate(&[doc("a.txt", text)]);
        assert_eq!(first.len(), 3);
        assert_eq!(ordered.len(), 3);
        assert_eq!(first.rows()[2].section, "SECCION: 200 VIDA");
        assert_eq!(ordered.rows()[2].section, "SECCION: 100 AUTOS");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let docs = vec![
            doc("a.txt", "Póliza 1\nSECCION: 100 AUTOS\n1. A 1.00 0.10\nB. Moto\nPLACA: M123\n9.00 0.90\n"),
            doc("b.txt", "Policy 2\nSECCION: 300 CASCO\nA. Yate 1,000,000.00 5,000.00\n"),
        ];
        let aggregator = aggregator(ExtractionConfig::default());
        assert_eq!(aggregator.aggregate(&docs), aggregator.aggregate(&docs));
    }

    #[test]
    fn test_process_batch_replaces_previous_rows() {
        let aggregator = aggregator(ExtractionConfig::default());
        let mut table = aggregator.aggregate(&[doc("a.txt", "SECCION: 100 AUTOS\n1. A 1.00 0.10\n")]);
        assert_eq!(table.len(), 1);

        let stats = aggregator.process_batch(&mut table, &[doc("b.txt", "SECCION: 100 AUTOS\n1. B 2.00 0.20\n2. C 3.00 0.30\n")]);
        assert_eq!(stats.rows, 2);
        let sources: Vec<&str> = table.rows().iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["b.txt", "b.txt"]);

        aggregator.process_batch(&mut table, &[]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_pdf_extractor_batch_with_text_documents() {
        use crate::document::PdfTextExtractor;

        let docs = vec![
            doc("poliza.txt", "Póliza 900\nCliente ANDES, SAC\nVigencia: 01/01/2024 - 01/01/2025\nSECCION: 100 VEHICULOS\n1. Auto 1,000.00 20.00\n"),
            doc("escaneado.pdf", ""),
            doc("notas.docx", "Póliza 1"),
        ];
        let (table, stats) = RowAggregator::new(PdfTextExtractor::new(), ExtractionConfig::default()).run(&docs);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].header.client, "ANDES, SAC");
        assert_eq!(table.rows()[0].header.validity, "01/01/2024 - 01/01/2025");
        assert_eq!(stats.unreadable, 2);
    }

    #[test]
    fn test_preview_is_a_prefix() {
        let body: String = (1..=15).map(|i| format!("{i}. Item {i} {i}.00 1.00\n")).collect();
        let text = format!("SECCION: 100 AUTOS\n{body}");
        let table = aggregator(ExtractionConfig::default()).aggregate(&[doc("a.txt", &text)]);
        assert_eq!(table.len(), 15);
        assert_eq!(table.preview(10).len(), 10);
        assert_eq!(table.preview(10), &table.rows()[..10]);
        assert_eq!(table.preview(50).len(), 15);
    }
}
