//! The engine's own JSON geometry document format: a top level object
//! with a `pages` array, each page carrying its tokens and strokes. This
//! is the interchange format the CLI reads and what PDF decoders are
//! expected to emit.

use super::{GeometrySource, PageGeometry};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDoc {
    pub pages: Vec<PageGeometry>,
}

/// [`GeometrySource`] for JSON geometry documents.
#[derive(Debug, Default)]
pub struct JsonSource;

impl GeometrySource for JsonSource {
    fn load_pages(&self, bytes: &[u8]) -> Result<Vec<PageGeometry>, EngineError> {
        let doc: GeometryDoc = serde_json::from_slice(bytes)?;
        Ok(doc.pages)
    }

    fn source_name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_pages() {
        let doc = r#"{
            "pages": [
                {
                    "index": 0,
                    "tokens": [
                        {
                            "text": "12.50",
                            "bbox": { "x0": 100.0, "y0": 200.0, "x1": 130.0, "y1": 208.0 },
                            "font_size": 8.0
                        }
                    ],
                    "strokes": [
                        { "kind": "line", "from": { "x": 100.0, "y": 210.0 }, "to": { "x": 100.0, "y": 260.0 } },
                        {
                            "kind": "arc",
                            "from": { "x": 10.0, "y": 10.0 },
                            "to": { "x": 20.0, "y": 10.0 },
                            "control": { "x": 15.0, "y": 4.0 }
                        }
                    ]
                }
            ]
        }"#;
        let pages = JsonSource.load_pages(doc.as_bytes()).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].tokens.len(), 1);
        assert_eq!(pages[0].tokens[0].text, "12.50");
        assert_eq!(pages[0].strokes.len(), 2);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let err = JsonSource.load_pages(b"not json").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
