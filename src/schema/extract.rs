//! Extraction response records.

use super::document::{ResponseDocument, TaskStatus, Usage};
use serde::{Deserialize, Serialize};

/// Processing quality requested for an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingQuality {
    /// Fast, text-layer based extraction.
    #[default]
    Low,
    /// Slower, higher fidelity extraction.
    High,
}

impl ProcessingQuality {
    /// Form field value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Options the service applied to an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractProcessingOptions {
    /// Whether the document was chunked.
    pub chunk: bool,
    /// Quality used.
    pub quality: ProcessingQuality,
}

/// Result of an extraction submission or status lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Job status; `pending` when the wait budget ran out first.
    pub status: TaskStatus,
    /// Metered usage.
    pub usage: Usage,
    /// Optional service message.
    #[serde(default)]
    pub message: Option<String>,
    /// Options the service applied.
    pub processing_options: ExtractProcessingOptions,
    /// Extracted document.
    pub document: ResponseDocument,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_pending_extraction() {
        let response: ExtractResponse = serde_json::from_value(json!({
            "status": "pending",
            "usage": { "pages": 7 },
            "processing_options": { "chunk": true, "quality": "low" },
            "document": {
                "id": "doc_123",
                "content": "",
                "source": "test_pdf.pdf",
                "source_type": "application/pdf",
                "num_chunks": 0,
                "chunks": []
            }
        }))
        .expect("extract response");

        assert_eq!(response.status, TaskStatus::Pending);
        assert_eq!(response.usage.pages, Some(7));
        assert_eq!(response.usage.tokens, None);
        assert_eq!(response.processing_options.quality, ProcessingQuality::Low);
        assert!(response.processing_options.chunk);
        assert_eq!(response.document.id, "doc_123");
    }
}
