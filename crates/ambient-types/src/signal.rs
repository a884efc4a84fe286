use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the signal entered the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Typed text.
    Text,
    /// Transcribed speech.
    Voice,
    /// OCR output from the vision sidecar.
    Ocr,
}

/// Pre-extraction produced by the upstream vision sidecar for OCR signals.
///
/// The sidecar recognizes known receipt layouts without consulting a
/// language model; when it is confident, its merchant/total take
/// precedence over text heuristics downstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OcrTrace {
    pub merchant: Option<String>,
    pub total: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    /// Extraction confidence reported by the sidecar, 0.0..=1.0.
    pub confidence: f64,
}

/// One unit of user input entering the pipeline. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSignal {
    pub signal_id: Uuid,
    pub kind: SignalKind,
    /// Original text with casing preserved — this is what gets stored.
    pub raw_text: String,
    /// Lowercased, diacritics-stripped text used only for matching.
    pub normalized_text: String,
    pub ocr_trace: Option<OcrTrace>,
    pub received_at: DateTime<Utc>,
}

impl RawSignal {
    /// Build a signal, deriving the normalized matching text.
    pub fn new(kind: SignalKind, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalize(&raw_text);
        Self {
            signal_id: Uuid::new_v4(),
            kind,
            raw_text,
            normalized_text,
            ocr_trace: None,
            received_at: Utc::now(),
        }
    }

    /// Attach the vision sidecar's pre-extraction.
    pub fn with_ocr_trace(mut self, trace: OcrTrace) -> Self {
        self.ocr_trace = Some(trace);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_text.trim().is_empty()
    }
}

/// Lowercase and strip the diacritics that show up in Portuguese input.
///
/// Matching never needs full Unicode normalization: the lexicons are
/// ASCII and the accented repertoire of user signals is small and fixed.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_diacritics_and_case() {
        let signal = RawSignal::new(SignalKind::Text, "Amanhã PAGAR o Cartão à Fnac");
        assert_eq!(signal.normalized_text, "amanha pagar o cartao a fnac");
        // Original casing survives for storage.
        assert!(signal.raw_text.contains("Amanhã"));
    }

    #[test]
    fn empty_signal_detected() {
        let signal = RawSignal::new(SignalKind::Voice, "   ");
        assert!(signal.is_empty());
    }

    #[test]
    fn signal_serialization() {
        let signal = RawSignal::new(SignalKind::Ocr, "continente 45,90").with_ocr_trace(OcrTrace {
            merchant: Some("Continente".into()),
            total: Some(45.90),
            currency: Some("EUR".into()),
            category: Some("Supermercado".into()),
            confidence: 0.93,
        });
        let json = serde_json::to_string(&signal).unwrap();
        let restored: RawSignal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.kind, SignalKind::Ocr);
        assert_eq!(restored.ocr_trace.unwrap().merchant.unwrap(), "Continente");
    }
}
