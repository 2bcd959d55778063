// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relate_type::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	pub ty: Type,
	pub nilable: bool,
}

impl ColumnDef {
	pub fn new(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			nilable: false,
		}
	}

	pub fn nilable(name: impl Into<String>, ty: Type) -> Self {
		Self {
			name: name.into(),
			ty,
			nilable: true,
		}
	}

	pub fn with_nilable(mut self, nilable: bool) -> Self {
		self.nilable = nilable;
		self
	}
}
