//! Resource paths addressed by catalog URIs.

use std::fmt;

use codelist_persistence::types::EntityKind;

use super::ResolveError;

/// One to three lowercased code values naming a registry, scheme or code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// Splits the part of a URI path that follows the prefix.
    ///
    /// A single trailing slash is tolerated. Each segment is
    /// percent-decoded, trimmed and lowercased; an empty segment fails with
    /// its 1-based position.
    pub fn parse(remainder: &str) -> Result<Self, ResolveError> {
        let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
        let remainder = remainder.strip_suffix('/').unwrap_or(remainder);
        if remainder.is_empty() {
            return Err(ResolveError::EmptyPath);
        }

        let segments = remainder
            .split('/')
            .enumerate()
            .map(|(index, raw)| decode_segment(raw, index + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_segments(segments)
    }

    /// Builds a path from already decoded segments.
    pub fn from_segments(segments: Vec<String>) -> Result<Self, ResolveError> {
        if segments.is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        if EntityKind::from_depth(segments.len()).is_none() {
            return Err(ResolveError::UnresolvableUri);
        }
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                let segment = segment.trim().to_lowercase();
                if segment.is_empty() {
                    Err(ResolveError::InvalidSegment { position: index + 1 })
                } else {
                    Ok(segment)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Path of a registry.
    pub fn registry(registry: &str) -> Self {
        Self {
            segments: vec![registry.to_lowercase()],
        }
    }

    /// Path of a scheme.
    pub fn scheme(registry: &str, scheme: &str) -> Self {
        Self {
            segments: vec![registry.to_lowercase(), scheme.to_lowercase()],
        }
    }

    /// Path of a code.
    pub fn code(registry: &str, scheme: &str, code: &str) -> Self {
        Self {
            segments: vec![
                registry.to_lowercase(),
                scheme.to_lowercase(),
                code.to_lowercase(),
            ],
        }
    }

    /// The kind of resource the path addresses.
    pub fn kind(&self) -> EntityKind {
        match self.segments.len() {
            1 => EntityKind::CodeRegistry,
            2 => EntityKind::CodeScheme,
            _ => EntityKind::Code,
        }
    }

    /// Registry code value.
    pub fn registry_code(&self) -> &str {
        &self.segments[0]
    }

    /// Scheme code value, for schemes and codes.
    pub fn scheme_code(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// Code value, for codes.
    pub fn code_value(&self) -> Option<&str> {
        self.segments.get(2).map(String::as_str)
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

fn decode_segment(raw: &str, position: usize) -> Result<String, ResolveError> {
    let decoded =
        urlencoding::decode(raw).map_err(|_| ResolveError::InvalidSegment { position })?;
    let segment = decoded.trim();
    if segment.is_empty() {
        return Err(ResolveError::InvalidSegment { position });
    }
    Ok(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_by_depth() {
        assert_eq!(
            ResourcePath::parse("jhs").unwrap().kind(),
            EntityKind::CodeRegistry
        );
        assert_eq!(
            ResourcePath::parse("jhs/kunta").unwrap().kind(),
            EntityKind::CodeScheme
        );
        assert_eq!(
            ResourcePath::parse("jhs/kunta/091").unwrap().kind(),
            EntityKind::Code
        );
    }

    #[test]
    fn test_segments_are_decoded_and_lowercased() {
        let path = ResourcePath::parse("/JHS/Kunta%20Koodit/091/").unwrap();
        assert_eq!(path.registry_code(), "jhs");
        assert_eq!(path.scheme_code(), Some("kunta koodit"));
        assert_eq!(path.code_value(), Some("091"));
        assert_eq!(path.to_string(), "jhs/kunta koodit/091");
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(ResourcePath::parse(""), Err(ResolveError::EmptyPath)));
        assert!(matches!(ResourcePath::parse("/"), Err(ResolveError::EmptyPath)));
    }

    #[test]
    fn test_empty_segment_position() {
        assert!(matches!(
            ResourcePath::parse("jhs//091"),
            Err(ResolveError::InvalidSegment { position: 2 })
        ));
        assert!(matches!(
            ResourcePath::parse("%20/kunta"),
            Err(ResolveError::InvalidSegment { position: 1 })
        ));
    }

    #[test]
    fn test_too_deep() {
        assert!(matches!(
            ResourcePath::parse("a/b/c/d"),
            Err(ResolveError::UnresolvableUri)
        ));
    }

    #[test]
    fn test_only_one_trailing_slash_tolerated() {
        assert!(matches!(
            ResourcePath::parse("jhs/kunta//"),
            Err(ResolveError::InvalidSegment { position: 3 })
        ));
    }
}
