// OCR: image binarization, text recognition, and confidence-driven retry.
//
// The OcrEngine trait keeps the retry logic independent of the recognizer.
// Tesseract is the production engine (behind the `ocr` feature); tests drive
// the retry loop with scripted engines.

pub mod preprocess;
pub mod retry;
pub mod spell;
pub mod tesseract;
pub mod traits;
