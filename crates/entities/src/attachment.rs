//! File attachment definitions.

use serde::{Deserialize, Serialize};

/// Largest file accepted for attachment, in bytes.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Broad document category derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Word,
    Spreadsheet,
    Image,
    Other,
}

/// A file embedded in a task. Has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name.
    pub name: String,
    /// Size of the original file in bytes.
    pub size: u64,
    /// MIME type, possibly empty.
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Encoded content, opaque to the store.
    #[serde(default)]
    pub data: String,
}

impl FileAttachment {
    /// Creates an attachment from an already encoded payload.
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Category used to pick an icon.
    pub fn kind(&self) -> DocumentKind {
        let t = self.mime_type.as_str();
        if t.contains("pdf") {
            DocumentKind::Pdf
        } else if t.contains("word") || t.contains("doc") {
            DocumentKind::Word
        } else if t.contains("sheet") || t.contains("xls") {
            DocumentKind::Spreadsheet
        } else if t.contains("image") {
            DocumentKind::Image
        } else {
            DocumentKind::Other
        }
    }

    /// Human readable size.
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

/// Formats a byte count as `B`, `KB` or `MB` with one decimal.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes}B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0MB");
    }

    #[test]
    fn test_kind_from_mime() {
        let file = |t: &str| FileAttachment::new("f", 1, t, "");
        assert_eq!(file("application/pdf").kind(), DocumentKind::Pdf);
        assert_eq!(file("application/msword").kind(), DocumentKind::Word);
        assert_eq!(
            file("application/vnd.ms-excel.sheet").kind(),
            DocumentKind::Spreadsheet
        );
        assert_eq!(file("image/png").kind(), DocumentKind::Image);
        assert_eq!(file("").kind(), DocumentKind::Other);
    }

    #[test]
    fn test_mime_type_serialized_as_type() {
        let file = FileAttachment::new("a.txt", 3, "text/plain", "YWJj");
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["type"], "text/plain");
    }
}
