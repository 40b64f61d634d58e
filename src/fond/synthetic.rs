//! Names produced by the outcome-splitting encoding.

use std::fmt;

/// Prefix of every synthetic action, synthetic method and synthetic subtask.
pub const SYNTHETIC_PREFIX: &str = "fond_act__";

/// Marker inside the names of the precondition stub actions guarding synthetic methods.
pub const PRECONDITION_STUB_MARKER: &str = "__method_precondition_fond_act__";

/// A parsed synthetic action name.
///
/// `fond_act__pick_up_2of3[b1,table]` is outcome 2 of 3 of the action `pick_up[b1,table]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntheticName {
    /// Name of the merged action.
    pub base: String,
    /// 1-based outcome number.
    pub index: usize,
    /// Number of outcomes of the merged action.
    pub count: usize,
}

impl SyntheticName {
    pub fn new(base: impl Into<String>, index: usize, count: usize) -> Self {
        Self {
            base: base.into(),
            index,
            count,
        }
    }

    /// Parse a synthetic action name; `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(SYNTHETIC_PREFIX)?;
        let (head, args) = split_arguments(rest);
        let (stem, tag) = head.rsplit_once('_')?;
        let (index, count) = tag.split_once("of")?;
        let index: usize = index.parse().ok()?;
        let count: usize = count.parse().ok()?;
        if stem.is_empty() || index == 0 || index > count {
            return None;
        }
        Some(Self::new(format!("{}{}", stem, args), index, count))
    }

    /// The synthetic action name this outcome was encoded as.
    pub fn render(&self) -> String {
        let (stem, args) = split_arguments(&self.base);
        format!(
            "{}{}_{}of{}{}",
            SYNTHETIC_PREFIX, stem, self.index, self.count, args
        )
    }
}

impl fmt::Display for SyntheticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn is_synthetic(name: &str) -> bool {
    name.starts_with(SYNTHETIC_PREFIX)
}

pub fn is_precondition_stub(name: &str) -> bool {
    name.contains(PRECONDITION_STUB_MARKER)
}

/// Split `name[args]` at the first `[`.
fn split_arguments(name: &str) -> (&str, &str) {
    match name.find('[') {
        Some(offset) => name.split_at(offset),
        None => (name, ""),
    }
}
