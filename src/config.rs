//! Conversion settings loaded from environment variables.
//!
//! - `HTN_SERIALIZER_OUTCOME_ORDER` - `index` (default) or `scan`
//! - `HTN_SERIALIZER_INCOMPLETE_GROUPS` - `prune` (default) or `keep`
//! - `HTN_SERIALIZER_KEEP_CONDITIONAL` - emit conditional effects (default `false`). The planner's
//!   domain reader does not accept the `{condition, effect}` objects this writes.
//! - `HTN_SERIALIZER_JOBS` - concurrent batch conversions (default: available parallelism)
//! - `HTN_SERIALIZER_TIMEOUT_SECS` - per-instance batch timeout (default `1800`)

use std::time::Duration;

use crate::error::{Error, Result};
use crate::fond::MergeOptions;

const DEFAULT_TIMEOUT_SECS: u64 = 30 * 60;

/// Order of the outcomes of a merged action.
///
/// - `Index`: By the outcome number encoded in the synthetic action name
/// - `Scan`: In the order the synthetic actions are met while scanning the action table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutcomeOrder {
    #[default]
    Index,
    Scan,
}

impl OutcomeOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Scan => "scan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "index" => Some(Self::Index),
            "scan" => Some(Self::Scan),
            _ => None,
        }
    }
}

/// What to do with a non-deterministic action some of whose outcome methods were removed
/// by the grounder.
///
/// - `Prune`: Drop the action and every method using it
/// - `Keep`: Keep the action with the outcomes that survived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncompleteGroupPolicy {
    #[default]
    Prune,
    Keep,
}

impl IncompleteGroupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prune => "prune",
            Self::Keep => "keep",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "prune" => Some(Self::Prune),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub merge: MergeOptions,
    /// Emit conditional effects in the output document. The planner's domain reader rejects
    /// documents that carry them.
    pub keep_conditional: bool,
    /// Concurrent conversions in a batch run.
    pub jobs: usize,
    /// Per-instance timeout in a batch run.
    pub timeout: Duration,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            merge: MergeOptions::default(),
            keep_conditional: false,
            jobs: default_jobs(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConvertConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("HTN_SERIALIZER_OUTCOME_ORDER") {
            config.merge.outcome_order = OutcomeOrder::from_str(value.trim())
                .ok_or_else(|| invalid("HTN_SERIALIZER_OUTCOME_ORDER", &value))?;
        }
        if let Some(value) = lookup("HTN_SERIALIZER_INCOMPLETE_GROUPS") {
            config.merge.incomplete_groups = IncompleteGroupPolicy::from_str(value.trim())
                .ok_or_else(|| invalid("HTN_SERIALIZER_INCOMPLETE_GROUPS", &value))?;
        }
        if let Some(value) = lookup("HTN_SERIALIZER_KEEP_CONDITIONAL") {
            config.keep_conditional = parse_bool(&value)
                .ok_or_else(|| invalid("HTN_SERIALIZER_KEEP_CONDITIONAL", &value))?;
        }
        if let Some(value) = lookup("HTN_SERIALIZER_JOBS") {
            config.jobs = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&jobs| jobs > 0)
                .ok_or_else(|| invalid("HTN_SERIALIZER_JOBS", &value))?;
        }
        if let Some(value) = lookup("HTN_SERIALIZER_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid("HTN_SERIALIZER_TIMEOUT_SECS", &value))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, value: &str) -> Error {
    Error::Config(format!("invalid value '{}' for {}", value, key))
}
