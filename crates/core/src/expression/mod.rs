// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::Value;

mod display;
mod evaluate;

pub use evaluate::{Scope, evaluate, is_satisfied};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
	Column(ColumnExpression),

	Constant(ConstantExpression),

	Equal(EqualExpression),

	NotEqual(NotEqualExpression),

	LessThan(LessThanExpression),

	LessThanEqual(LessThanEqualExpression),

	GreaterThan(GreaterThanExpression),

	GreaterThanEqual(GreaterThanEqualExpression),

	And(AndExpression),

	Or(OrExpression),

	Not(NotExpression),
}

/// A column reference, optionally qualified by the relation it is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnExpression {
	pub qualifier: Option<String>,
	pub name: String,
}

impl ColumnExpression {
	pub fn unqualified(&self) -> ColumnExpression {
		ColumnExpression {
			qualifier: None,
			name: self.name.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantExpression {
	pub value: Value,
}

macro_rules! binary_expression {
	($name:ident) => {
		#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
		pub struct $name {
			pub left: Box<Expression>,
			pub right: Box<Expression>,
		}
	};
}

binary_expression!(EqualExpression);
binary_expression!(NotEqualExpression);
binary_expression!(LessThanExpression);
binary_expression!(LessThanEqualExpression);
binary_expression!(GreaterThanExpression);
binary_expression!(GreaterThanEqualExpression);
binary_expression!(AndExpression);
binary_expression!(OrExpression);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotExpression {
	pub expression: Box<Expression>,
}

pub fn column(qualifier: impl Into<String>, name: impl Into<String>) -> Expression {
	Expression::Column(ColumnExpression {
		qualifier: Some(qualifier.into()),
		name: name.into(),
	})
}

pub fn unqualified(name: impl Into<String>) -> Expression {
	Expression::Column(ColumnExpression {
		qualifier: None,
		name: name.into(),
	})
}

pub fn constant(value: impl Into<Value>) -> Expression {
	Expression::Constant(ConstantExpression {
		value: value.into(),
	})
}

pub fn eq(left: Expression, right: Expression) -> Expression {
	Expression::Equal(EqualExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn not_eq(left: Expression, right: Expression) -> Expression {
	Expression::NotEqual(NotEqualExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn less_than(left: Expression, right: Expression) -> Expression {
	Expression::LessThan(LessThanExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn greater_than(left: Expression, right: Expression) -> Expression {
	Expression::GreaterThan(GreaterThanExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn and(left: Expression, right: Expression) -> Expression {
	Expression::And(AndExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn or(left: Expression, right: Expression) -> Expression {
	Expression::Or(OrExpression {
		left: Box::new(left),
		right: Box::new(right),
	})
}

pub fn not(expression: Expression) -> Expression {
	Expression::Not(NotExpression {
		expression: Box::new(expression),
	})
}

/// Left-deep conjunction of `expressions`, `None` when there are none.
pub fn conjunction(expressions: impl IntoIterator<Item = Expression>) -> Option<Expression> {
	expressions.into_iter().reduce(and)
}

impl Expression {
	/// Every column reference, in left-to-right order.
	pub fn columns(&self) -> Vec<&ColumnExpression> {
		let mut result = Vec::new();
		self.collect_columns(&mut result);
		result
	}

	fn collect_columns<'a>(&'a self, result: &mut Vec<&'a ColumnExpression>) {
		match self {
			Expression::Column(column) => result.push(column),
			Expression::Constant(_) => {}
			Expression::Not(not) => not.expression.collect_columns(result),
			_ => {
				if let Some((left, right)) = self.operands() {
					left.collect_columns(result);
					right.collect_columns(result);
				}
			}
		}
	}

	/// The two operands of a binary expression.
	pub fn operands(&self) -> Option<(&Expression, &Expression)> {
		match self {
			Expression::Equal(e) => Some((&e.left, &e.right)),
			Expression::NotEqual(e) => Some((&e.left, &e.right)),
			Expression::LessThan(e) => Some((&e.left, &e.right)),
			Expression::LessThanEqual(e) => Some((&e.left, &e.right)),
			Expression::GreaterThan(e) => Some((&e.left, &e.right)),
			Expression::GreaterThanEqual(e) => Some((&e.left, &e.right)),
			Expression::And(e) => Some((&e.left, &e.right)),
			Expression::Or(e) => Some((&e.left, &e.right)),
			Expression::Column(_) | Expression::Constant(_) | Expression::Not(_) => None,
		}
	}

	/// Returns a new tree with every column reference rewritten by `f`. The
	/// receiver is left untouched.
	pub fn map_columns(&self, f: &impl Fn(&ColumnExpression) -> ColumnExpression) -> Expression {
		let map = |e: &Expression| Box::new(e.map_columns(f));
		match self {
			Expression::Column(column) => Expression::Column(f(column)),
			Expression::Constant(constant) => Expression::Constant(constant.clone()),
			Expression::Equal(e) => Expression::Equal(EqualExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::NotEqual(e) => Expression::NotEqual(NotEqualExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::LessThan(e) => Expression::LessThan(LessThanExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::LessThanEqual(e) => Expression::LessThanEqual(LessThanEqualExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::GreaterThan(e) => Expression::GreaterThan(GreaterThanExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::GreaterThanEqual(e) => Expression::GreaterThanEqual(GreaterThanEqualExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::And(e) => Expression::And(AndExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::Or(e) => Expression::Or(OrExpression {
				left: map(&e.left),
				right: map(&e.right),
			}),
			Expression::Not(e) => Expression::Not(NotExpression {
				expression: map(&e.expression),
			}),
		}
	}

	/// The same tree with all qualifiers removed.
	pub fn unqualified(&self) -> Expression {
		self.map_columns(&ColumnExpression::unqualified)
	}
}
