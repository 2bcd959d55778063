// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Predicate analysis: natural join synthesis, equi-join recognition and
//! join key extraction.

use relate_core::{
	Expression, JoinKind, RelationDef,
	expression::{ColumnExpression, column, conjunction, eq},
};
use relate_type::{Diagnostic, Fragment, Result, return_error};
use tracing::{instrument, warn};

use crate::{JoinConfig, JoinSide, error::JoinError, warning};

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
	pub natural: bool,
	/// The condition with side qualifiers, as written or synthesized.
	pub condition: Option<Expression>,
	/// The condition over result column names.
	pub bound_condition: Option<Expression>,
	pub left_key: Vec<String>,
	pub right_key: Vec<String>,
	/// Columns that appear once in the result although both sides have them.
	pub merged: Vec<String>,
	pub warnings: Vec<Diagnostic>,
}

impl Analysis {
	pub fn is_product(&self) -> bool {
		self.left_key.is_empty()
	}

	fn product(natural: bool) -> Self {
		Self {
			natural,
			condition: None,
			bound_condition: None,
			left_key: vec![],
			right_key: vec![],
			merged: vec![],
			warnings: vec![],
		}
	}
}

#[instrument(name = "join::analyze", level = "trace", skip_all, fields(kind = %kind, left = %left.name, right = %right.name))]
pub fn analyze(
	kind: JoinKind,
	left: &RelationDef,
	right: &RelationDef,
	condition: Option<&Expression>,
	config: &JoinConfig,
) -> Result<Analysis> {
	let analysis = match (kind, condition) {
		(JoinKind::Times, Some(condition)) => {
			return_error!(JoinError::ProductWithCondition {
				fragment: Fragment::statement(condition.to_string()),
			})
		}
		(JoinKind::Times, None) => Analysis::product(false),
		(_, None) => natural(left, right, config)?,
		(_, Some(condition)) => explicit(left, right, condition)?,
	};

	if !kind.is_semi() {
		check_product_compatible(left, right, &analysis.merged)?;
	}

	for warning in &analysis.warnings {
		warn!(code = %warning.code, "{}", warning.message);
	}
	Ok(analysis)
}

fn natural(left: &RelationDef, right: &RelationDef, config: &JoinConfig) -> Result<Analysis> {
	let mut common = Vec::new();
	for l in &left.columns {
		let Some(r) = right.column(&l.name) else {
			continue;
		};
		if l.ty != r.ty {
			return_error!(JoinError::TableExpressionsNotCompatible {
				column: l.name.clone(),
				left: l.ty,
				right: r.ty,
			});
		}
		common.push(l.name.clone());
	}

	if common.is_empty() {
		let mut analysis = Analysis::product(true);
		if config.warn_on_natural_product {
			analysis.warnings.push(warning::natural_join_without_common_columns(&left.name, &right.name));
		}
		return Ok(analysis);
	}

	let condition = conjunction(common.iter().map(|c| eq(column(&left.name, c), column(&right.name, c))));
	let bound_condition = condition.as_ref().map(Expression::unqualified);
	Ok(Analysis {
		natural: true,
		condition,
		bound_condition,
		left_key: common.clone(),
		right_key: common.clone(),
		merged: common,
		warnings: vec![],
	})
}

fn explicit(left: &RelationDef, right: &RelationDef, condition: &Expression) -> Result<Analysis> {
	// identifiers are checked before the shape so that typos are reported as such
	for column in condition.columns() {
		resolve(column, left, right)?;
	}

	let mut left_key = Vec::new();
	let mut right_key = Vec::new();
	extract(condition, left, right, &mut left_key, &mut right_key)?;

	let merged = left_key.iter().zip(right_key.iter()).filter(|(l, r)| l == r).map(|(l, _)| l.clone()).collect();

	Ok(Analysis {
		natural: false,
		condition: Some(condition.clone()),
		bound_condition: Some(condition.unqualified()),
		left_key,
		right_key,
		merged,
		warnings: vec![],
	})
}

/// Whether `expression` is a conjunction of equalities, each comparing a
/// column of one side with a column of the other.
pub fn is_equi_join(expression: &Expression, left: &RelationDef, right: &RelationDef) -> bool {
	extract(expression, left, right, &mut Vec::new(), &mut Vec::new()).is_ok()
}

/// Walks the conjunction left to right, appending one key pair per
/// equality.
fn extract(
	expression: &Expression,
	left: &RelationDef,
	right: &RelationDef,
	left_key: &mut Vec<String>,
	right_key: &mut Vec<String>,
) -> Result<()> {
	match expression {
		Expression::And(and) => {
			extract(&and.left, left, right, left_key, right_key)?;
			extract(&and.right, left, right, left_key, right_key)
		}
		Expression::Equal(equal) => {
			let (Expression::Column(a), Expression::Column(b)) = (equal.left.as_ref(), equal.right.as_ref())
			else {
				return_error!(not_equi_join(expression));
			};
			match (resolve(a, left, right)?, resolve(b, left, right)?) {
				(JoinSide::Left, JoinSide::Right) => {
					left_key.push(a.name.clone());
					right_key.push(b.name.clone());
				}
				(JoinSide::Right, JoinSide::Left) => {
					left_key.push(b.name.clone());
					right_key.push(a.name.clone());
				}
				_ => return_error!(not_equi_join(expression)),
			}
			Ok(())
		}
		_ => return_error!(not_equi_join(expression)),
	}
}

fn not_equi_join(expression: &Expression) -> JoinError {
	JoinError::JoinMustBeEquiJoin {
		fragment: Fragment::statement(expression.to_string()),
	}
}

/// Resolves a column reference to the side it belongs to.
pub fn resolve(column: &ColumnExpression, left: &RelationDef, right: &RelationDef) -> Result<JoinSide> {
	let fragment = || Fragment::statement(column.to_string());

	let (in_left, in_right) = match &column.qualifier {
		Some(qualifier) => (
			qualifier == &left.name && left.contains(&column.name),
			qualifier == &right.name && right.contains(&column.name),
		),
		None => (left.contains(&column.name), right.contains(&column.name)),
	};

	match (in_left, in_right) {
		(true, false) => Ok(JoinSide::Left),
		(false, true) => Ok(JoinSide::Right),
		(true, true) => return_error!(JoinError::AmbiguousIdentifier {
			fragment: fragment(),
		}),
		(false, false) => return_error!(JoinError::UnknownIdentifier {
			fragment: fragment(),
		}),
	}
}

fn check_product_compatible(left: &RelationDef, right: &RelationDef, merged: &[String]) -> Result<()> {
	for column in &left.columns {
		if right.contains(&column.name) && !merged.contains(&column.name) {
			return_error!(JoinError::TableExpressionsNotProductCompatible {
				column: column.name.clone(),
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use relate_core::{
		ColumnDef, Type,
		expression::{and, constant, greater_than, unqualified},
	};

	use super::*;

	fn customers() -> RelationDef {
		RelationDef::new(
			"customers",
			vec![ColumnDef::new("id", Type::Int8), ColumnDef::new("name", Type::Utf8)],
		)
		.with_key(["id"])
	}

	fn orders() -> RelationDef {
		RelationDef::new(
			"orders",
			vec![
				ColumnDef::new("order_id", Type::Int8),
				ColumnDef::new("customer_id", Type::Int8),
				ColumnDef::new("region", Type::Utf8),
				ColumnDef::new("day", Type::Int4),
			],
		)
		.with_key(["order_id"])
	}

	fn analyze_explicit(condition: Expression) -> Result<Analysis> {
		analyze(JoinKind::Inner, &customers(), &orders(), Some(&condition), &JoinConfig::default())
	}

	#[test]
	fn test_natural_join_synthesizes_condition() {
		let left = customers();
		let right = RelationDef::new(
			"accounts",
			vec![ColumnDef::new("id", Type::Int8), ColumnDef::new("balance", Type::Int8)],
		);
		let analysis = analyze(JoinKind::Inner, &left, &right, None, &JoinConfig::default()).unwrap();

		assert!(analysis.natural);
		assert_eq!(analysis.left_key, vec!["id"]);
		assert_eq!(analysis.right_key, vec!["id"]);
		assert_eq!(analysis.merged, vec!["id"]);
		assert_eq!(analysis.condition.unwrap().to_string(), "customers.id = accounts.id");
		assert_eq!(analysis.bound_condition.unwrap().to_string(), "id = id");
	}

	#[test]
	fn test_natural_join_type_mismatch() {
		let right = RelationDef::new("other", vec![ColumnDef::new("id", Type::Utf8)]);
		let err = analyze(JoinKind::Inner, &customers(), &right, None, &JoinConfig::default()).unwrap_err();
		assert_eq!(err.code(), "JOIN_004");
	}

	#[test]
	fn test_natural_without_common_columns_warns() {
		let analysis = analyze(JoinKind::Inner, &customers(), &orders(), None, &JoinConfig::default()).unwrap();
		assert!(analysis.is_product());
		assert_eq!(analysis.warnings.len(), 1);
		assert_eq!(analysis.warnings[0].code, "JOIN_W001");

		let quiet = JoinConfig {
			warn_on_natural_product: false,
			..JoinConfig::default()
		};
		let analysis = analyze(JoinKind::Having, &customers(), &orders(), None, &quiet).unwrap();
		assert!(analysis.warnings.is_empty());
	}

	#[test]
	fn test_times_never_warns() {
		let analysis = analyze(JoinKind::Times, &customers(), &orders(), None, &JoinConfig::default()).unwrap();
		assert!(analysis.is_product());
		assert!(!analysis.natural);
		assert!(analysis.warnings.is_empty());
	}

	#[test]
	fn test_times_with_condition() {
		let condition = eq(column("customers", "id"), column("orders", "customer_id"));
		let err = analyze(JoinKind::Times, &customers(), &orders(), Some(&condition), &JoinConfig::default())
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_006");
	}

	#[test]
	fn test_extraction_preserves_order() {
		let left = RelationDef::new(
			"l",
			vec![
				ColumnDef::new("a", Type::Int4),
				ColumnDef::new("b", Type::Int4),
				ColumnDef::new("c", Type::Int4),
			],
		);
		let right = RelationDef::new(
			"r",
			vec![
				ColumnDef::new("x", Type::Int4),
				ColumnDef::new("y", Type::Int4),
				ColumnDef::new("z", Type::Int4),
			],
		);
		let condition = and(
			and(eq(column("l", "c"), column("r", "x")), eq(column("r", "z"), column("l", "a"))),
			eq(column("l", "b"), column("r", "y")),
		);
		let analysis =
			analyze(JoinKind::Inner, &left, &right, Some(&condition), &JoinConfig::default()).unwrap();

		assert_eq!(analysis.left_key, vec!["c", "a", "b"]);
		assert_eq!(analysis.right_key, vec!["x", "z", "y"]);
		assert!(analysis.merged.is_empty());

		let rebuilt = conjunction(
			analysis.left_key.iter().zip(&analysis.right_key).map(|(l, r)| eq(column("l", l), column("r", r))),
		)
		.unwrap();
		let reanalysis = analyze(JoinKind::Inner, &left, &right, Some(&rebuilt), &JoinConfig::default()).unwrap();
		assert_eq!(reanalysis.left_key, analysis.left_key);
		assert_eq!(reanalysis.right_key, analysis.right_key);
	}

	#[test]
	fn test_unqualified_columns_resolve() {
		let analysis = analyze_explicit(eq(unqualified("customer_id"), unqualified("id"))).unwrap();
		assert_eq!(analysis.left_key, vec!["id"]);
		assert_eq!(analysis.right_key, vec!["customer_id"]);
		assert_eq!(analysis.bound_condition.unwrap().to_string(), "customer_id = id");
	}

	#[test]
	fn test_non_equality_is_rejected() {
		let err = analyze_explicit(greater_than(column("customers", "id"), column("orders", "customer_id")))
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_001");

		let err = analyze_explicit(eq(column("customers", "id"), constant(1))).unwrap_err();
		assert_eq!(err.code(), "JOIN_001");
	}

	#[test]
	fn test_same_side_twice_is_rejected() {
		let err = analyze_explicit(eq(column("orders", "order_id"), column("orders", "customer_id"))).unwrap_err();
		assert_eq!(err.code(), "JOIN_001");
	}

	#[test]
	fn test_unknown_identifier() {
		let err = analyze_explicit(eq(column("customers", "missing"), column("orders", "customer_id"))).unwrap_err();
		assert_eq!(err.code(), "JOIN_002");

		let err = analyze_explicit(eq(column("nowhere", "id"), column("orders", "customer_id"))).unwrap_err();
		assert_eq!(err.code(), "JOIN_002");

		// the qualifier wins over a column of the same name on the other side
		let err = analyze_explicit(eq(column("orders", "name"), column("orders", "customer_id"))).unwrap_err();
		assert_eq!(err.code(), "JOIN_002");
	}

	#[test]
	fn test_ambiguous_identifier() {
		let right = RelationDef::new(
			"accounts",
			vec![ColumnDef::new("id", Type::Int8), ColumnDef::new("owner", Type::Int8)],
		);
		let condition = eq(unqualified("id"), column("accounts", "owner"));
		let err = analyze(JoinKind::Inner, &customers(), &right, Some(&condition), &JoinConfig::default())
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_003");
	}

	#[test]
	fn test_colliding_column_names() {
		let right = RelationDef::new(
			"accounts",
			vec![ColumnDef::new("owner", Type::Int8), ColumnDef::new("name", Type::Utf8)],
		);
		let condition = eq(column("customers", "id"), column("accounts", "owner"));
		let err = analyze(JoinKind::Inner, &customers(), &right, Some(&condition), &JoinConfig::default())
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_005");

		// a semi join only produces left columns
		analyze(JoinKind::Having, &customers(), &right, Some(&condition), &JoinConfig::default()).unwrap();
	}

	#[test]
	fn test_equal_names_are_merged() {
		let right = RelationDef::new(
			"accounts",
			vec![ColumnDef::new("id", Type::Int8), ColumnDef::new("balance", Type::Int8)],
		);
		let condition = eq(column("accounts", "id"), column("customers", "id"));
		let analysis =
			analyze(JoinKind::Inner, &customers(), &right, Some(&condition), &JoinConfig::default()).unwrap();
		assert!(!analysis.natural);
		assert_eq!(analysis.merged, vec!["id"]);
	}

	#[test]
	fn test_is_equi_join() {
		let customers = customers();
		let orders = orders();
		assert!(is_equi_join(&eq(column("customers", "id"), column("orders", "customer_id")), &customers, &orders));
		assert!(!is_equi_join(
			&and(
				eq(column("customers", "id"), column("orders", "customer_id")),
				greater_than(column("orders", "day"), constant(3))
			),
			&customers,
			&orders
		));
	}
}
