// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use relate_type::{Fragment, error::diagnostic::query, return_error};

use super::{ColumnExpression, Expression};
use crate::{Result, Row, Value};

/// Supplies column values to the evaluator.
pub trait Scope {
	fn resolve(&self, column: &ColumnExpression) -> Option<Value>;
}

impl Scope for Row {
	fn resolve(&self, column: &ColumnExpression) -> Option<Value> {
		self.get(&column.name).cloned()
	}
}

/// Evaluates `expression` with three-valued logic: a comparison involving an
/// absent value is itself absent, and `and`/`or` follow Kleene's rules.
pub fn evaluate(expression: &Expression, scope: &impl Scope) -> Result<Value> {
	let compare = |left: &Expression, right: &Expression, test: fn(Ordering) -> bool| -> Result<Value> {
		let left = evaluate(left, scope)?;
		let right = evaluate(right, scope)?;
		Ok(match left.compare(&right) {
			Some(ordering) => Value::Boolean(test(ordering)),
			None => Value::Undefined,
		})
	};

	match expression {
		Expression::Column(column) => match scope.resolve(column) {
			Some(value) => Ok(value),
			None => return_error!(query::column_not_found(Fragment::statement(column.to_string()))),
		},
		Expression::Constant(constant) => Ok(constant.value.clone()),
		Expression::Equal(e) => compare(&e.left, &e.right, Ordering::is_eq),
		Expression::NotEqual(e) => compare(&e.left, &e.right, Ordering::is_ne),
		Expression::LessThan(e) => compare(&e.left, &e.right, Ordering::is_lt),
		Expression::LessThanEqual(e) => compare(&e.left, &e.right, Ordering::is_le),
		Expression::GreaterThan(e) => compare(&e.left, &e.right, Ordering::is_gt),
		Expression::GreaterThanEqual(e) => compare(&e.left, &e.right, Ordering::is_ge),
		Expression::And(e) => {
			let left = condition(&e.left, scope)?;
			if left == Some(false) {
				return Ok(Value::Boolean(false));
			}
			let right = condition(&e.right, scope)?;
			Ok(match (left, right) {
				(_, Some(false)) => Value::Boolean(false),
				(Some(true), Some(true)) => Value::Boolean(true),
				_ => Value::Undefined,
			})
		}
		Expression::Or(e) => {
			let left = condition(&e.left, scope)?;
			if left == Some(true) {
				return Ok(Value::Boolean(true));
			}
			let right = condition(&e.right, scope)?;
			Ok(match (left, right) {
				(_, Some(true)) => Value::Boolean(true),
				(Some(false), Some(false)) => Value::Boolean(false),
				_ => Value::Undefined,
			})
		}
		Expression::Not(e) => Ok(match condition(&e.expression, scope)? {
			Some(v) => Value::Boolean(!v),
			None => Value::Undefined,
		}),
	}
}

/// True only when `expression` evaluates to `true`; absent counts as not
/// satisfied.
pub fn is_satisfied(expression: &Expression, scope: &impl Scope) -> Result<bool> {
	Ok(condition(expression, scope)? == Some(true))
}

fn condition(expression: &Expression, scope: &impl Scope) -> Result<Option<bool>> {
	let value = evaluate(expression, scope)?;
	match value {
		Value::Undefined => Ok(None),
		Value::Boolean(v) => Ok(Some(v)),
		other => return_error!(query::not_a_condition(
			Fragment::statement(expression.to_string()),
			&other.get_type().to_string()
		)),
	}
}
