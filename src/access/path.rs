//! Parse-once field paths.

use core::fmt;

// -----------------------------------------------------------------------------
// TreePath

/// A field path into a JSON-like tree, parsed once at construction.
///
/// Dotted and bracketed forms are equivalent: `a.b[0].c` holds the same
/// segments as `a.b.0.c`. A segment that parses as an integer addresses an
/// index when the node it lands on is an array, and a plain key otherwise.
///
/// # Examples
///
/// ```
/// use treebind::access::TreePath;
///
/// let path = TreePath::parse("a[0].bar.c");
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.to_string(), "a.0.bar.c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(Box<[Box<str>]>);

impl TreePath {
    /// Parses a dotted/bracketed path string.
    ///
    /// Empty segments are skipped, so `a..b` and `a[.b` both parse as `a.b`.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split(['.', '[', ']'])
                .filter(|segment| !segment.is_empty())
                .map(Box::from)
                .collect(),
        )
    }

    /// Builds a path from pre-split segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Box<str>>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns the number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path holds no segments at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub(crate) fn segments(&self) -> &[Box<str>] {
        &self.0
    }
}

impl From<&str> for TreePath {
    #[inline]
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TreePath;

    #[test]
    fn parses_dotted_and_bracketed_forms_alike() {
        assert_eq!(TreePath::parse("a.b[0].c"), TreePath::parse("a.b.0.c"));
        assert_eq!(TreePath::parse("a.b[0].c").len(), 4);
    }

    #[test]
    fn skips_empty_segments() {
        assert_eq!(TreePath::parse("a..b"), TreePath::parse("a.b"));
        assert!(TreePath::parse("").is_empty());
    }

    #[test]
    fn from_segments_matches_parse() {
        assert_eq!(
            TreePath::from_segments(["a", "0", "bar", "c"]),
            TreePath::parse("a[0].bar.c")
        );
    }

    #[test]
    fn display_joins_with_dots() {
        assert_eq!(TreePath::parse("a[0].bar.c").to_string(), "a.0.bar.c");
    }
}
