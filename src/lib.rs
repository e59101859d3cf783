// Shortlist: OCR-driven resume screening
//
// This is the library root. Each module corresponds to one stage of the
// screening pipeline, plus the configuration and output around it.

pub mod config;
pub mod entities;
pub mod ingest;
pub mod job;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod text;
