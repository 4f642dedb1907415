//! Error handling for the resume scanner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Input too large: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Skill catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl ResumeScannerError {
    /// True when the whole document could not be turned into text.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            ResumeScannerError::FileNotFound(_)
                | ResumeScannerError::Io(_)
                | ResumeScannerError::PdfExtraction(_)
                | ResumeScannerError::DocxExtraction(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResumeScannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failure_classification() {
        assert!(ResumeScannerError::PdfExtraction("bad xref".to_string()).is_extraction_failure());
        assert!(ResumeScannerError::FileNotFound("cv.pdf".to_string()).is_extraction_failure());
        assert!(!ResumeScannerError::Catalog("empty".to_string()).is_extraction_failure());
    }

    #[test]
    fn test_too_large_message() {
        let err = ResumeScannerError::InputTooLarge { size: 2048, limit: 1024 };
        assert_eq!(err.to_string(), "Input too large: 2048 bytes exceeds the 1024 byte limit");
    }
}
