// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relate_type::{Diagnostic, Fragment};

pub fn natural_join_without_common_columns(left: &str, right: &str) -> Diagnostic {
	Diagnostic {
		code: "JOIN_W001".to_string(),
		statement: None,
		message: format!("'{}' and '{}' have no common columns, the natural join is a product", left, right),
		fragment: Fragment::internal(format!("{} join {}", left, right)),
		label: Some("no condition could be inferred".to_string()),
		help: Some("Write an explicit condition, or use 'times' if a product is intended".to_string()),
		notes: vec![],
		cause: None,
	}
}
