// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use relate_type::{Diagnostic, Fragment, IntoDiagnostic, Type};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JoinError {
	#[error("join condition must be a conjunction of column equalities")]
	JoinMustBeEquiJoin {
		fragment: Fragment,
	},

	#[error("unknown identifier '{fragment}'")]
	UnknownIdentifier {
		fragment: Fragment,
	},

	#[error("ambiguous identifier '{fragment}'")]
	AmbiguousIdentifier {
		fragment: Fragment,
	},

	#[error("column '{column}' has type {left} on the left and {right} on the right")]
	TableExpressionsNotCompatible {
		column: String,
		left: Type,
		right: Type,
	},

	#[error("column '{column}' appears on both sides of the join")]
	TableExpressionsNotProductCompatible {
		column: String,
	},

	#[error("a product cannot carry a join condition")]
	ProductWithCondition {
		fragment: Fragment,
	},

	#[error("invalid value '{value}' for modifier '{key}'")]
	InvalidModifierValue {
		key: String,
		value: String,
		expected: String,
	},

	#[error("invalid propagation policy: {reason}")]
	InvalidPropagationPolicy {
		reason: String,
	},

	#[error("row violates join predicate")]
	RowViolatesJoinPredicate {
		predicate: String,
		row: String,
	},

	#[error("row violates having predicate")]
	RowViolatesHavingPredicate {
		predicate: String,
		row: String,
	},

	#[error("row violates without predicate")]
	RowViolatesWithoutPredicate {
		predicate: String,
		row: String,
	},

	#[error("unknown source '{name}'")]
	UnknownSource {
		name: String,
	},
}

impl IntoDiagnostic for JoinError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			JoinError::JoinMustBeEquiJoin {
				fragment,
			} => Diagnostic {
				code: "JOIN_001".to_string(),
				statement: None,
				message: "Join condition must be a conjunction of column equalities".to_string(),
				fragment,
				label: Some("not an equality between a left and a right column".to_string()),
				help: Some("Write the condition as 'left.a = right.b and ...'".to_string()),
				notes: vec![
					"Only '=' comparisons between bare columns joined by 'and' are supported".to_string(),
					"Each comparison must reference one column of each side".to_string(),
				],
				cause: None,
			},

			JoinError::UnknownIdentifier {
				fragment,
			} => Diagnostic {
				code: "JOIN_002".to_string(),
				statement: None,
				message: format!("Unknown identifier '{}'", fragment.text()),
				fragment,
				label: Some("not a column of either side".to_string()),
				help: Some("Check the qualifier and column name for typos".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::AmbiguousIdentifier {
				fragment,
			} => Diagnostic {
				code: "JOIN_003".to_string(),
				statement: None,
				message: format!("Ambiguous identifier '{}'", fragment.text()),
				fragment,
				label: Some("resolves to a column of both sides".to_string()),
				help: Some("Qualify the column with the name of the side it belongs to".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::TableExpressionsNotCompatible {
				column,
				left,
				right,
			} => Diagnostic {
				code: "JOIN_004".to_string(),
				statement: None,
				message: format!(
					"Common column '{}' has type {} on the left but {} on the right",
					column, left, right
				),
				fragment: Fragment::internal(column),
				label: Some("natural join columns must have the same type".to_string()),
				help: Some("Rename one of the columns or join with an explicit condition".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::TableExpressionsNotProductCompatible {
				column,
			} => Diagnostic {
				code: "JOIN_005".to_string(),
				statement: None,
				message: format!("Column '{}' appears on both sides of the join", column),
				fragment: Fragment::internal(column),
				label: Some("the result would contain this column twice".to_string()),
				help: Some("Rename the column on one side, or equate the two columns in the condition".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::ProductWithCondition {
				fragment,
			} => Diagnostic {
				code: "JOIN_006".to_string(),
				statement: None,
				message: "A product cannot carry a join condition".to_string(),
				fragment,
				label: Some("condition given here".to_string()),
				help: Some("Use an inner join to apply a condition".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::InvalidModifierValue {
				key,
				value,
				expected,
			} => Diagnostic {
				code: "JOIN_007".to_string(),
				statement: None,
				message: format!("Invalid value '{}' for modifier '{}'", value, key),
				fragment: Fragment::internal(key),
				label: Some(format!("expected {}", expected)),
				help: None,
				notes: vec![],
				cause: None,
			},

			JoinError::InvalidPropagationPolicy {
				reason,
			} => Diagnostic {
				code: "JOIN_008".to_string(),
				statement: None,
				message: format!("Invalid propagation policy: {}", reason),
				fragment: Fragment::None,
				label: None,
				help: Some("Adjust the join modifiers".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::RowViolatesJoinPredicate {
				predicate,
				row,
			} => Diagnostic {
				code: "JOIN_009".to_string(),
				statement: None,
				message: format!("Row {} violates the join predicate", row),
				fragment: Fragment::internal(predicate),
				label: Some("predicate is not satisfied".to_string()),
				help: Some("Make the joined columns agree before writing the row".to_string()),
				notes: vec![],
				cause: None,
			},

			JoinError::RowViolatesHavingPredicate {
				predicate,
				row,
			} => Diagnostic {
				code: "JOIN_010".to_string(),
				statement: None,
				message: format!("Row {} has no matching row", row),
				fragment: Fragment::internal(predicate),
				label: Some("having requires a matching row".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			JoinError::RowViolatesWithoutPredicate {
				predicate,
				row,
			} => Diagnostic {
				code: "JOIN_011".to_string(),
				statement: None,
				message: format!("Row {} has a matching row", row),
				fragment: Fragment::internal(predicate),
				label: Some("without requires that no row matches".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			JoinError::UnknownSource {
				name,
			} => Diagnostic {
				code: "JOIN_012".to_string(),
				statement: None,
				message: format!("Unknown source '{}'", name),
				fragment: Fragment::internal(name),
				label: Some("no relation with this name".to_string()),
				help: Some("Register the relation with the catalog before binding".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}
