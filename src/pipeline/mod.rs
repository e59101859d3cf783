// Batch screening pipeline.

pub mod screen;

pub use screen::{extract_text, screen, ExtractedResume, ScreenOptions, ScreeningReport, ScreeningResult};
