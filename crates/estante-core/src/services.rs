//! Boundary contracts for the external capture services.
//!
//! Speech-to-text and OCR are opaque collaborators: the core consumes
//! only the text they produce or the failure they report. Both calls
//! are blocking with a single attempt; any timeout is imposed by the
//! caller, and on failure no resolution is attempted.

use thiserror::Error;

/// Classified transcription failures, reported to the caller as a
/// labeled outcome rather than a raw fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptionFailure {
    /// The audio could not be interpreted as speech.
    #[error("audio could not be understood")]
    Unintelligible,
    /// Transport or service failure.
    #[error("transcription request failed: {0}")]
    RequestError(String),
}

/// Speech-to-text over a recorded audio stream.
pub trait TranscriptionService {
    /// Transcribe recorded audio (a complete container, any length)
    /// with a language hint such as `"es-ES"`.
    fn transcribe(&self, audio: &[u8], language: &str) -> Result<String, TranscriptionFailure>;
}

/// OCR failure at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrFailure {
    #[error("text extraction failed: {0}")]
    RequestError(String),
}

/// Optical character recognition over a captured cover image.
///
/// Returns the raw extracted text: no structure and no confidence
/// score are assumed.
pub trait OcrEngine {
    fn extract_text(&self, image: &[u8], language: &str) -> Result<String, OcrFailure>;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Transcription double that returns a fixed outcome.
    pub struct FixedTranscription(pub Result<String, TranscriptionFailure>);

    impl TranscriptionService for FixedTranscription {
        fn transcribe(&self, _audio: &[u8], _language: &str) -> Result<String, TranscriptionFailure> {
            self.0.clone()
        }
    }

    /// OCR double that returns a fixed dump.
    pub struct FixedOcr(pub String);

    impl OcrEngine for FixedOcr {
        fn extract_text(&self, _image: &[u8], _language: &str) -> Result<String, OcrFailure> {
            Ok(self.0.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn failure_outcomes_are_distinguishable() {
        let service = FixedTranscription(Err(TranscriptionFailure::Unintelligible));
        match service.transcribe(b"...", "es-ES") {
            Err(TranscriptionFailure::Unintelligible) => {}
            other => panic!("expected Unintelligible, got {other:?}"),
        }

        let service = FixedTranscription(Err(TranscriptionFailure::RequestError(
            "connection reset".into(),
        )));
        assert!(matches!(
            service.transcribe(b"...", "es-ES"),
            Err(TranscriptionFailure::RequestError(_))
        ));
    }

    #[test]
    fn ocr_yields_raw_text() {
        let engine = FixedOcr("BRAVE NEW WORLD 1932".into());
        assert_eq!(
            engine.extract_text(b"jpeg-bytes", "spa").unwrap(),
            "BRAVE NEW WORLD 1932"
        );
    }
}
