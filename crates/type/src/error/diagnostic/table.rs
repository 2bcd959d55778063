// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{error::diagnostic::Diagnostic, fragment::Fragment};

pub fn duplicate_key(relation: &str, columns: &[String]) -> Diagnostic {
	Diagnostic {
		code: "TABLE_001".to_string(),
		statement: None,
		message: format!("Duplicate key {{ {} }} in relation '{}'", columns.join(", "), relation),
		fragment: Fragment::internal(relation),
		label: Some("a row with the same key values already exists".to_string()),
		help: Some("Update the existing row or choose different key values".to_string()),
		notes: vec!["Every candidate key of a relation must be unique".to_string()],
		cause: None,
	}
}

pub fn row_not_found(relation: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_002".to_string(),
		statement: None,
		message: format!("Row not found in relation '{}'", relation),
		fragment: Fragment::internal(relation),
		label: Some("no row matches the given values".to_string()),
		help: Some("The row may have been deleted or its key changed concurrently".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn column_not_nilable(relation: &str, column: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_003".to_string(),
		statement: None,
		message: format!("Column '{}' of relation '{}' requires a value", column, relation),
		fragment: Fragment::internal(column),
		label: Some("value is absent".to_string()),
		help: Some("Provide a value for the column or declare it nilable".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn column_type_mismatch(relation: &str, column: &str, expected: &str, actual: &str) -> Diagnostic {
	Diagnostic {
		code: "TABLE_004".to_string(),
		statement: None,
		message: format!(
			"Column '{}' of relation '{}' expects {}, got {}",
			column, relation, expected, actual
		),
		fragment: Fragment::internal(column),
		label: Some("value has the wrong type".to_string()),
		help: Some("Convert the value to the column type before writing it".to_string()),
		notes: vec![],
		cause: None,
	}
}
