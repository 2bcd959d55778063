// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;
mod inner;
mod outer;
mod semi;

pub use inner::InnerJoinNode;
pub use outer::OuterJoinNode;
pub use semi::SemiJoinNode;
