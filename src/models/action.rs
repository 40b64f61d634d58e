use serde::{Deserialize, Serialize};

/// A primitive task the executing agent can apply.
///
/// A deterministic action holds exactly one outcome. A non-deterministic action holds one
/// outcome per alternative effect set; which of them occurs is not under the agent's control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub cost: u32,
    /// Names of the features that must hold before execution.
    pub preconditions: Vec<String>,
    /// Never empty.
    pub effects: Vec<EffectOutcome>,
}

impl Action {
    pub fn is_deterministic(&self) -> bool {
        self.effects.len() == 1
    }
}

/// One possible result of executing an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectOutcome {
    pub add: EffectList,
    pub delete: EffectList,
}

impl EffectOutcome {
    pub fn conditional_count(&self) -> usize {
        self.add.conditional.len() + self.delete.conditional.len()
    }
}

/// The decoded content of one effect line.
///
/// Conditional effects are recognized and kept here, but nothing downstream gives them
/// execution semantics yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectList {
    pub unconditional: Vec<String>,
    pub conditional: Vec<ConditionalEffect>,
}

/// An effect that only fires when all of its condition features hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEffect {
    pub condition: Vec<String>,
    pub effect: String,
}
