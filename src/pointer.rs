//! JSON pointers into the document's schema tree.

use percent_encoding::percent_decode_str;

/// Structural keywords that name a container rather than a schema.
pub const STRUCTURAL_SEGMENTS: &[&str] = &["definitions", "properties"];

/// A parsed JSON pointer such as `#/definitions/app/properties/id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    raw: String,
    segments: Vec<String>,
}

impl Pointer {
    /// Parse a pointer string. Accepts percent-encoded input and the RFC 6901
    /// `~1`/`~0` escapes.
    pub fn parse(raw: &str) -> Self {
        let decoded = percent_decode_str(raw).decode_utf8_lossy().into_owned();
        let path = decoded.trim_start_matches('#').trim_start_matches('/');
        let segments = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').map(decode_segment).collect()
        };
        Self {
            raw: decoded,
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, e.g. `app` for `#/definitions/app`. `None` for the root pointer.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segments that name schemas, with `definitions`/`properties` keywords dropped.
    pub fn named_segments(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .map(String::as_str)
            .filter(|s| !STRUCTURAL_SEGMENTS.contains(s))
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn decode_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_pointer() {
        let ptr = Pointer::parse("#/definitions/app/definitions/name");
        assert_eq!(ptr.segments(), ["definitions", "app", "definitions", "name"]);
        assert_eq!(ptr.name(), Some("name"));
        assert_eq!(ptr.as_str(), "#/definitions/app/definitions/name");
    }

    #[test]
    fn parse_percent_encoded_pointer() {
        let ptr = Pointer::parse("%23%2Fdefinitions%2Fstruct%2Fdefinitions%2Fuuid");
        assert_eq!(ptr.as_str(), "#/definitions/struct/definitions/uuid");
        assert_eq!(ptr.named_segments().collect::<Vec<_>>(), ["struct", "uuid"]);
    }

    #[test]
    fn parse_root_pointer() {
        let ptr = Pointer::parse("#");
        assert!(ptr.segments().is_empty());
        assert_eq!(ptr.name(), None);
    }

    #[test]
    fn named_segments_drop_properties_keyword() {
        let ptr = Pointer::parse("#/definitions/app/properties/id");
        assert_eq!(ptr.named_segments().collect::<Vec<_>>(), ["app", "id"]);
    }

    #[test]
    fn escaped_segments_unescaped() {
        let ptr = Pointer::parse("#/patternProperties/^a~1b~0$");
        assert_eq!(ptr.segments(), ["patternProperties", "^a/b~$"]);
    }
}
