use serde::{Deserialize, Serialize};

/// An atomic proposition of the grounded problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFeature {
    /// Position in the `state_features` section.
    pub index: usize,
    pub name: String,
}
