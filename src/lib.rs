//! Conversion of grounded HTN planning problems into structured FOND domains.
//!
//! [`ground::parse`] turns the grounder's index-based text dump into a named [`models::Domain`];
//! [`fond::merge`] folds the synthetic deterministic actions that encode non-deterministic
//! actions back into multi-outcome actions; [`output`] writes the result for the planner.

pub mod batch;
pub mod config;
pub mod error;
pub mod fond;
pub mod ground;
pub mod models;
pub mod output;
pub mod render;

pub use config::ConvertConfig;
pub use error::{Error, Result};

use models::Domain;

/// Parse grounder output and merge its non-deterministic actions.
pub fn convert(text: &str, config: &ConvertConfig) -> Result<Domain> {
    let mut domain = ground::parse(text)?;
    fond::merge(&mut domain, &config.merge)?;
    Ok(domain)
}
