// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinSide {
	Left,
	Right,
}

impl JoinSide {
	pub fn other(&self) -> JoinSide {
		match self {
			JoinSide::Left => JoinSide::Right,
			JoinSide::Right => JoinSide::Left,
		}
	}

	/// Suffix used by per-side modifier names, e.g. `PropagateInsertLeft`.
	pub fn suffix(&self) -> &'static str {
		match self {
			JoinSide::Left => "Left",
			JoinSide::Right => "Right",
		}
	}
}

impl Display for JoinSide {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			JoinSide::Left => f.write_str("left"),
			JoinSide::Right => f.write_str("right"),
		}
	}
}
