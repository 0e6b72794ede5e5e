mod composite_extractor;
mod natural_boundary_splitter;
mod pdf_extractor;
mod plain_text_extractor;
mod text_sanitizer;

pub use composite_extractor::CompositeExtractor;
pub use natural_boundary_splitter::{NaturalBoundarySplitter, split_text};
pub use pdf_extractor::PdfExtractor;
pub use plain_text_extractor::PlainTextExtractor;
pub use text_sanitizer::sanitize_extracted_text;
