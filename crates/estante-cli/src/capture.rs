//! File-backed capture adapters.
//!
//! Stand-ins for the real speech and OCR services: each consumes the
//! terminal text those services would have produced, so both query
//! paths are drivable end-to-end without audio or image processing.

use estante_core::services::{OcrEngine, OcrFailure, TranscriptionFailure, TranscriptionService};

/// Transcription over a pre-transcribed recording: the "audio" bytes
/// are the transcript file contents.
pub struct TranscriptDump;

impl TranscriptionService for TranscriptDump {
    fn transcribe(&self, audio: &[u8], _language: &str) -> Result<String, TranscriptionFailure> {
        let text = std::str::from_utf8(audio).map_err(|_| TranscriptionFailure::Unintelligible)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(TranscriptionFailure::Unintelligible);
        }
        Ok(text.to_string())
    }
}

/// OCR over a pre-extracted dump: the "image" bytes are the raw text
/// the engine pulled off the cover.
pub struct TextDumpOcr;

impl OcrEngine for TextDumpOcr {
    fn extract_text(&self, image: &[u8], _language: &str) -> Result<String, OcrFailure> {
        std::str::from_utf8(image)
            .map(str::to_string)
            .map_err(|e| OcrFailure::RequestError(e.to_string()))
    }
}
