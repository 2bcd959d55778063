// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::Deserialize;

/// Planner options shared by every join bound with them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
	/// Give an unordered side an ordered index so joins can probe instead
	/// of looping.
	pub inject_ordering: bool,
	pub warn_on_natural_product: bool,
}

impl Default for JoinConfig {
	fn default() -> Self {
		Self {
			inject_ordering: true,
			warn_on_natural_product: true,
		}
	}
}
