//! Domain models for grounded HTN problems.
//!
//! # Core Concepts
//!
//! ## Index-addressed Entities
//!
//! These exist only while the grounder output is being deserialized:
//!
//! - [`StateFeature`]: An atomic proposition, addressed by its position in the feature section.
//! - [`Task`]: A primitive or abstract task, addressed by its position in the task section.
//!   Positions `[0, P)` are the primitive tasks, one per action, in declaration order.
//!
//! ## Named Entities
//!
//! After deserialization every cross-reference is a name:
//!
//! - [`Action`]: A primitive task with a cost, preconditions and one or more [`EffectOutcome`]s.
//! - [`Method`]: A decomposition of an abstract task into a partially ordered subtask network.
//! - [`Domain`]: The aggregate root handed to the non-determinism merger and then serialized.

mod action;
mod domain;
mod feature;
mod method;
mod task;

pub use action::*;
pub use domain::*;
pub use feature::*;
pub use method::*;
pub use task::*;
