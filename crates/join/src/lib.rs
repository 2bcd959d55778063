// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Relational joins: recognizing join predicates, inferring the keys and
//! cardinality of join results, choosing how to produce their rows, and
//! turning mutations of a join result into mutations of its two sides.

pub mod analyze;
mod bind;
mod builder;
mod config;
mod cursor;
mod error;
pub mod infer;
mod node;
mod plan;
pub mod policy;
pub mod probe;
pub mod select;
mod side;
mod warning;

pub use bind::{BoundJoin, JoinBinder};
pub use builder::JoinBuilder;
pub use config::JoinConfig;
pub use error::JoinError;
pub use node::{InnerJoinNode, OuterJoinNode, SemiJoinNode};
pub use plan::JoinPlan;
pub use policy::{JoinPolicy, PropagateAction, SidePolicy};
pub use select::JoinAlgorithm;
pub use side::JoinSide;
