// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Fragment, error::diagnostic::Diagnostic};

pub fn column_not_found(fragment: Fragment) -> Diagnostic {
	Diagnostic {
		code: "QUERY_001".to_string(),
		statement: None,
		message: "column not found".to_string(),
		fragment,
		label: Some("this column does not exist in the current context".to_string()),
		help: Some("check for typos or ensure the column is defined in the input".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn not_a_condition(fragment: Fragment, actual: &str) -> Diagnostic {
	Diagnostic {
		code: "QUERY_002".to_string(),
		statement: None,
		message: format!("expected a boolean condition, got {}", actual),
		fragment,
		label: Some("this expression does not evaluate to a boolean".to_string()),
		help: Some("compare the value against something to form a condition".to_string()),
		notes: vec![],
		cause: None,
	}
}
