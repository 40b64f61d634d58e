use super::{parse_integers, to_index, FeatureTable, SENTINEL};
use crate::error::{Error, Result};
use crate::models::{ConditionalEffect, EffectList};

/// Decode one add or delete effect line.
///
/// The line is a sequence of blocks `C c_1 .. c_C e`: `C` condition features followed by
/// exactly one effect feature, so `0 e` is an unconditional effect. A `-1` where a block
/// would start separates blocks or ends the line, and the line must end with one.
pub fn decode_effects(line: &str, features: &FeatureTable) -> Result<EffectList> {
    let values = parse_integers(line, "effect line")?;
    if values.last() != Some(&SENTINEL) {
        return Err(Error::malformed(format!(
            "effect line '{}' is not terminated by {}",
            line, SENTINEL
        )));
    }

    let mut effects = EffectList::default();
    let mut cursor = 0;
    while cursor < values.len() {
        if values[cursor] == SENTINEL {
            cursor += 1;
            continue;
        }

        let condition_count = to_index(values[cursor], "effect condition count")?;
        let end = cursor.saturating_add(condition_count).saturating_add(2);
        let (effect, conditions) = values
            .get(cursor + 1..end)
            .and_then(|block| block.split_last())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "effect line '{}' has a truncated block at position {}",
                    line, cursor
                ))
            })?;

        let effect = features
            .name(to_index(*effect, "effect feature")?)?
            .to_string();
        if conditions.is_empty() {
            effects.unconditional.push(effect);
        } else {
            let condition = conditions
                .iter()
                .map(|&value| {
                    to_index(value, "effect condition")
                        .and_then(|index| features.name(index).map(str::to_string))
                })
                .collect::<Result<Vec<_>>>()?;
            effects.conditional.push(ConditionalEffect { condition, effect });
        }
        cursor = end;
    }

    Ok(effects)
}
