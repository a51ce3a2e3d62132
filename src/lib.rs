//! Semantic normalizer for GM marketing pages.
//!
//! Raw markup captures go through three passes: serialization of the markup
//! trees into typed nodes, extraction of domain entities (models, prices,
//! trims, sections, disclosures), and a merge that de-duplicates entities by
//! stable id across pages. A separate pass flattens the merged graph into
//! chunked retrieval documents.

pub mod brand;
pub mod docs;
pub mod graph;
pub mod normalizer;
pub mod parser;
pub mod raw;
pub mod text;

pub use brand::BrandProfile;
pub use docs::{build_documents, chunk_text, ChunkParams, DocType, Document};
pub use graph::DomainGraph;
pub use normalizer::Normalizer;
pub use raw::{PageCapture, PageMetadata, RawNode};
