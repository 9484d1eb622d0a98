use estante_text::TypedToken;

/// A per-request noisy input. Created for one resolution attempt and
/// discarded with the response.
#[derive(Debug, Clone)]
pub enum NoisyQuery {
    /// Transcript of a spoken utterance, or a manually typed title.
    Spoken { transcript: String },
    /// OCR dump of a photographed cover plus its extracted tokens.
    CoverScan {
        ocr_text: String,
        tokens: Vec<TypedToken>,
    },
}

impl NoisyQuery {
    pub fn spoken(transcript: impl Into<String>) -> Self {
        Self::Spoken {
            transcript: transcript.into(),
        }
    }

    /// Build a cover-scan query: the dump is upper-cased before span
    /// extraction so letter runs classify as capital runs regardless
    /// of how the OCR engine cased them.
    pub fn cover_scan(ocr_text: impl Into<String>) -> Self {
        let ocr_text = ocr_text.into();
        let tokens = estante_text::extract(&ocr_text.to_uppercase());
        Self::CoverScan { ocr_text, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_scan_extracts_upper_cased_tokens() {
        let query = NoisyQuery::cover_scan("Brave New World 1932");
        match query {
            NoisyQuery::CoverScan { tokens, .. } => {
                assert_eq!(
                    tokens,
                    vec![
                        TypedToken::Text("BRAVE NEW WORLD".into()),
                        TypedToken::Integer(1932),
                    ]
                );
            }
            other => panic!("expected CoverScan, got {other:?}"),
        }
    }
}
