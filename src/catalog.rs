//! Server-side media catalog
//!
//! A server declares what it can produce as a list of [`MediaDescriptor`]s,
//! each naming a content type and optionally one or more interchangeable
//! formats. The catalog flattens that list into `(content type, format)`
//! pairs, preserving declaration order. Declaration order is preference
//! order: when several pairs satisfy the client equally well, the earliest
//! declared one wins.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Media Descriptors
// ============================================================================

/// One producible media type as declared by the caller.
///
/// When `formats` is present and non-empty it expands into one pair per
/// format and the single `format` field is ignored. Descriptors with an
/// empty content type are dropped during flattening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// The content type, e.g. `application/vnd.shop.Order`
    pub content_type: String,

    /// A single serialization format, e.g. `json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Interchangeable serialization formats, in preference order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
}

impl MediaDescriptor {
    /// Create a descriptor with no format suffix.
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            format: None,
            formats: None,
        }
    }

    /// Set a single format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set multiple interchangeable formats.
    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// Media Pairs
// ============================================================================

/// A `(content type, format)` pair, the atomic unit of matching.
///
/// Two pairs are equal when their content types are equal and their formats
/// are equal, with an absent format treated the same as an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPair {
    pub content_type: String,
    pub format: Option<String>,
}

impl MediaPair {
    pub fn new(content_type: impl Into<String>, format: Option<String>) -> Self {
        Self {
            content_type: content_type.into(),
            format,
        }
    }

    /// The value to send in an outgoing `Content-Type` header.
    ///
    /// Renders `content_type` alone, or `content_type + "+" + format` when a
    /// non-empty format is present.
    pub fn header_value(&self) -> String {
        match self.format.as_deref() {
            Some(format) if !format.is_empty() => {
                format!("{}+{}", self.content_type, format)
            }
            _ => self.content_type.clone(),
        }
    }

    /// Composite key used by the hash-based intersection.
    pub(crate) fn key(&self) -> String {
        format!("{}+{}", self.content_type, self.format.as_deref().unwrap_or(""))
    }
}

impl PartialEq for MediaPair {
    fn eq(&self, other: &Self) -> bool {
        self.content_type == other.content_type
            && self.format.as_deref().unwrap_or("") == other.format.as_deref().unwrap_or("")
    }
}

impl Eq for MediaPair {}

impl fmt::Display for MediaPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_value())
    }
}

// ============================================================================
// Media Catalog
// ============================================================================

/// The flattened, ordered list of pairs a server can produce.
///
/// Construction fails when no usable pair remains after flattening, so a
/// catalog in hand is always non-empty and negotiation never has to guard
/// against indexing an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCatalog {
    pairs: Vec<MediaPair>,
}

impl MediaCatalog {
    /// Flatten descriptors into pairs, preserving input order.
    ///
    /// Pure transformation: no dedup happens here. Duplicate keys are
    /// resolved later by the intersection, which keeps one survivor per key.
    pub fn flatten(descriptors: &[MediaDescriptor]) -> Vec<MediaPair> {
        let mut pairs = Vec::new();
        for descriptor in descriptors {
            if descriptor.content_type.is_empty() {
                continue;
            }
            match &descriptor.formats {
                Some(formats) if !formats.is_empty() => {
                    for format in formats {
                        pairs.push(MediaPair::new(
                            descriptor.content_type.clone(),
                            Some(format.clone()),
                        ));
                    }
                }
                _ => {
                    pairs.push(MediaPair::new(
                        descriptor.content_type.clone(),
                        descriptor.format.clone(),
                    ));
                }
            }
        }
        pairs
    }

    /// Build a catalog, failing fast when nothing is producible.
    pub fn build(descriptors: &[MediaDescriptor]) -> Result<Self, crate::Error> {
        let pairs = Self::flatten(descriptors);
        if pairs.is_empty() {
            return Err(crate::Error::Config(
                "no producible media types declared".to_string(),
            ));
        }
        Ok(Self { pairs })
    }

    /// All pairs in declaration order.
    pub fn pairs(&self) -> &[MediaPair] {
        &self.pairs
    }

    /// The server's highest-priority pair, used as the fallback default.
    pub fn preferred(&self) -> &MediaPair {
        &self.pairs[0]
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaPair> {
        self.pairs.iter()
    }
}
