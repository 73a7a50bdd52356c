//! Capture/match records (spec §3 "Match record", §4.4).

use std::ops::Range;

/// A capturing group's identity: its parse-order index, and its name
/// if it was declared `(<name>:...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId {
    pub index: usize,
    pub name: Option<String>,
}

/// One captured subsequence in a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedGroup {
    pub id: GroupId,
    pub range: Range<usize>,
}

impl CapturedGroup {
    pub fn index(&self) -> usize {
        self.id.index
    }

    pub fn name(&self) -> Option<&str> {
        self.id.name.as_deref()
    }
}

/// The result of a successful match: overall range plus every group
/// that ended up with a value, in parse order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub groups: Vec<CapturedGroup>,
}

impl Match {
    /// `end == start` for a zero-width match.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Look a captured group up by its anonymous index.
    pub fn group(&self, index: usize) -> Option<&CapturedGroup> {
        self.groups.iter().find(|g| g.id.index == index)
    }

    /// Look a captured group up by name.
    pub fn named_group(&self, name: &str) -> Option<&CapturedGroup> {
        self.groups.iter().find(|g| g.id.name.as_deref() == Some(name))
    }
}
