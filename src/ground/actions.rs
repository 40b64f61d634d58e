use std::collections::BTreeMap;

use super::{decode_effects, parse_index_list, parse_integers, FeatureTable, TaskTable};
use super::ACTION_RECORD_LINES;
use crate::error::{Error, Result};
use crate::models::{Action, EffectOutcome};

/// Build one single-outcome action per four-line record.
///
/// Record `i` is the action of primitive task `i`.
pub fn build_actions(
    lines: &[String],
    features: &FeatureTable,
    tasks: &TaskTable,
) -> Result<BTreeMap<String, Action>> {
    let mut actions = BTreeMap::new();
    for (i, record) in lines.chunks(ACTION_RECORD_LINES).enumerate() {
        let [cost, preconditions, add, delete] = record else {
            return Err(Error::malformed(format!(
                "action record {} has {} lines",
                i,
                record.len()
            )));
        };

        let name = tasks.name(i)?.to_string();
        let action = Action {
            name: name.clone(),
            cost: parse_cost(cost, &name)?,
            preconditions: features.names(&parse_index_list(preconditions, "preconditions")?)?,
            effects: vec![EffectOutcome {
                add: decode_effects(add, features)?,
                delete: decode_effects(delete, features)?,
            }],
        };

        if actions.insert(name.clone(), action).is_some() {
            return Err(Error::malformed(format!("duplicate action '{}'", name)));
        }
    }
    Ok(actions)
}

fn parse_cost(line: &str, action: &str) -> Result<u32> {
    match parse_integers(line, "action cost")?.as_slice() {
        [cost] => u32::try_from(*cost).map_err(|_| {
            Error::malformed(format!("action '{}' has invalid cost {}", action, cost))
        }),
        _ => Err(Error::malformed(format!(
            "action '{}' has cost line '{}'",
            action, line
        ))),
    }
}
