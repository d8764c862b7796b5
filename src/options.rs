//! Per-call marshalling options.

// -----------------------------------------------------------------------------
// SerializerOptions

/// Options applied to a single marshalling call.
///
/// The only option today is group filtering: when one or more groups are
/// requested, a binding participates only if its own group tags intersect the
/// requested set. Without requested groups every binding participates.
///
/// # Examples
///
/// ```
/// use treebind::SerializerOptions;
///
/// let options = SerializerOptions::groups(["WithAge", "WithSize", "WithAge"]);
/// assert!(options.has_groups());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializerOptions {
    groups: Vec<String>,
}

impl SerializerOptions {
    /// Options with no filtering at all.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a single group.
    pub fn group(tag: impl Into<String>) -> Self {
        Self {
            groups: vec![tag.into()],
        }
    }

    /// Requests a set of groups, normalized to an ordered, deduplicated list.
    pub fn groups<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !groups.contains(&tag) {
                groups.push(tag);
            }
        }
        Self { groups }
    }

    /// Whether any group filtering was requested.
    #[inline]
    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    // A binding participates when no filtering was requested, or when its
    // tags intersect the requested set.
    pub(crate) fn selects(&self, binding_groups: &[&'static str]) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        binding_groups
            .iter()
            .any(|tag| self.groups.iter().any(|requested| requested == tag))
    }
}

#[cfg(test)]
mod tests {
    use super::SerializerOptions;

    #[test]
    fn groups_are_deduplicated_in_order() {
        let options = SerializerOptions::groups(["b", "a", "b"]);
        assert_eq!(options, SerializerOptions::groups(["b", "a"]));
    }

    #[test]
    fn no_requested_groups_selects_everything() {
        let options = SerializerOptions::new();
        assert!(options.selects(&[]));
        assert!(options.selects(&["Group1"]));
    }

    #[test]
    fn requested_groups_select_by_intersection() {
        let options = SerializerOptions::groups(["Group1", "Group2"]);
        assert!(options.selects(&["Group2", "Group3"]));
        assert!(!options.selects(&["Group4"]));
        assert!(!options.selects(&[]));
    }

    #[test]
    fn single_group_constructor_matches_set_form() {
        assert_eq!(
            SerializerOptions::group("Group1"),
            SerializerOptions::groups(["Group1"])
        );
    }
}
