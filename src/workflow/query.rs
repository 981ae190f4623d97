//! Rule listing filters
//!
//! Each axis is independent and an empty set on an axis matches everything.

use crate::workflow::{Labels, Rule};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    /// Rule must share at least one category (empty = no filter)
    pub categories: Labels,
    /// Rule must share at least one tag (empty = no filter)
    pub tags: Labels,
    pub project: Option<String>,
}

impl RuleFilter {
    pub fn matches(&self, rule: &Rule) -> bool {
        intersects_or_unfiltered(&self.categories, &rule.categories)
            && intersects_or_unfiltered(&self.tags, &rule.tags)
            && self
                .project
                .as_deref()
                .map_or(true, |p| rule.project.as_deref() == Some(p))
    }
}

fn intersects_or_unfiltered(wanted: &Labels, have: &Labels) -> bool {
    wanted.is_empty() || !wanted.is_disjoint(have)
}

/// Split a comma-separated query value into a label set
pub fn parse_label_list(raw: Option<&str>) -> Labels {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
