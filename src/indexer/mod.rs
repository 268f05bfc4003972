//! PDF extraction, cleaning and chunking
//!
//! Turns a PDF (or a directory of PDFs) into [`DocumentChunk`]s carrying
//! source, page and category metadata, ready for embedding.
//!
//! [`DocumentChunk`]: crate::types::DocumentChunk

mod category;
mod chunker;
mod pdf_extractor;
mod processor;
mod text_cleaner;

pub use category::{DEFAULT_CATEGORY, detect_category};
pub use chunker::TextSplitter;
pub use pdf_extractor::{ExtractedPdf, extract_pdf, extract_pdf_from_bytes};
pub use processor::{DirectoryOutcome, PdfProcessor};
pub use text_cleaner::clean_text;
