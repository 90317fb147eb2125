//! Document, chunk, and status records shared by chunk and extract responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processing state of a remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still being processed.
    Pending,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Whether no further status change can occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Wire representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metered usage reported for a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    /// Pages processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
    /// Seconds of media processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u64>,
}

/// One segment of a processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseChunk {
    /// Chunk identifier.
    pub id: String,
    /// Chunk text.
    pub content: String,
    /// Position of the chunk in the document.
    pub chunk_index: u64,
    /// Token count of the chunk.
    pub num_tokens: u64,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Media type of the processed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// `application/pdf`
    #[serde(rename = "application/pdf")]
    ApplicationPdf,
    /// `text/plain`
    #[serde(rename = "text/plain")]
    TextPlain,
    /// `video/mp4`
    #[serde(rename = "video/mp4")]
    VideoMp4,
    /// Any media type this SDK version does not know about.
    #[serde(other)]
    Other,
}

impl SourceType {
    /// Guess the media type from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::ApplicationPdf),
            "txt" => Some(Self::TextPlain),
            "mp4" => Some(Self::VideoMp4),
            _ => None,
        }
    }

    /// MIME string for known types.
    pub fn mime(self) -> Option<&'static str> {
        match self {
            Self::ApplicationPdf => Some("application/pdf"),
            Self::TextPlain => Some("text/plain"),
            Self::VideoMp4 => Some("video/mp4"),
            Self::Other => None,
        }
    }
}

/// Document owned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDocument {
    /// Opaque document identifier, used for status lookups.
    pub id: String,
    /// Extracted or submitted text.
    pub content: String,
    /// Origin of the document (file name or URL).
    pub source: String,
    /// Media type of the source.
    pub source_type: SourceType,
    /// Number of chunks produced.
    pub num_chunks: u64,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Chunks produced so far.
    #[serde(default)]
    pub chunks: Vec<ResponseChunk>,
}
