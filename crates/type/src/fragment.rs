// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The piece of source text a diagnostic points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragment {
	#[default]
	None,
	/// Text produced by the engine itself, e.g. a synthesized natural join
	/// condition or a column name taken from a relation header.
	Internal {
		text: String,
	},
	/// Text written by the caller, e.g. a qualified identifier in a join
	/// condition.
	Statement {
		text: String,
	},
}

impl Fragment {
	pub fn internal(text: impl Into<String>) -> Self {
		Fragment::Internal {
			text: text.into(),
		}
	}

	pub fn statement(text: impl Into<String>) -> Self {
		Fragment::Statement {
			text: text.into(),
		}
	}

	pub fn text(&self) -> &str {
		match self {
			Fragment::None => "",
			Fragment::Internal {
				text,
			}
			| Fragment::Statement {
				text,
			} => text,
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Fragment::None)
	}
}

impl Display for Fragment {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.text())
	}
}
