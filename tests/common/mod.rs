#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use folio::{BuildError, BuildOutput, BuildReport, Document, DocumentBuilder, GenerateOptions};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub report: BuildReport,
}

impl GeneratedPdf {
    pub fn from_output(output: BuildOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&output.bytes)?;
        Ok(Self {
            bytes: output.bytes,
            doc,
            report: output.report,
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of one page, 1-based like lopdf's page numbers.
    pub fn page_text(&self, page_num: u32) -> String {
        self.doc.extract_text(&[page_num]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

/// Build one document with the given builder.
pub fn generate_with(builder: &DocumentBuilder, document: &Document) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let output = runtime()?.block_on(builder.generate(document))?;
    GeneratedPdf::from_output(output)
}

/// Build one document with default options.
pub fn generate(document: &Document) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    generate_with(&DocumentBuilder::new(GenerateOptions::default()), document)
}

/// Build one document from a JSON description.
pub fn generate_from_json(value: serde_json::Value) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let document: Document = serde_json::from_value(value)?;
    generate(&document)
}

/// Build several documents into one PDF.
pub fn generate_consolidated(builder: &DocumentBuilder, documents: &[Document]) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let output = runtime()?.block_on(builder.generate_consolidated(documents))?;
    GeneratedPdf::from_output(output)
}

/// Build a document and return the error instead of a PDF.
pub fn generate_err(builder: &DocumentBuilder, document: &Document) -> BuildError {
    match runtime().map(|rt| rt.block_on(builder.generate(document))) {
        Ok(Err(err)) => err,
        Ok(Ok(_)) => panic!("build of '{}' unexpectedly succeeded", document.id),
        Err(io) => panic!("failed to start runtime: {}", io),
    }
}
