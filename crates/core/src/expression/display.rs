// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use super::{ColumnExpression, ConstantExpression, Expression};

impl Display for ColumnExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.qualifier {
			Some(qualifier) => write!(f, "{}.{}", qualifier, self.name),
			None => f.write_str(&self.name),
		}
	}
}

impl Display for ConstantExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.value, f)
	}
}

impl Expression {
	fn precedence(&self) -> u8 {
		match self {
			Expression::Or(_) => 1,
			Expression::And(_) => 2,
			Expression::Not(_) => 3,
			Expression::Equal(_)
			| Expression::NotEqual(_)
			| Expression::LessThan(_)
			| Expression::LessThanEqual(_)
			| Expression::GreaterThan(_)
			| Expression::GreaterThanEqual(_) => 4,
			Expression::Column(_) | Expression::Constant(_) => 5,
		}
	}

	fn operator(&self) -> &'static str {
		match self {
			Expression::Equal(_) => "=",
			Expression::NotEqual(_) => "!=",
			Expression::LessThan(_) => "<",
			Expression::LessThanEqual(_) => "<=",
			Expression::GreaterThan(_) => ">",
			Expression::GreaterThanEqual(_) => ">=",
			Expression::And(_) => "and",
			Expression::Or(_) => "or",
			_ => "",
		}
	}

	fn fmt_operand(&self, operand: &Expression, f: &mut Formatter<'_>) -> std::fmt::Result {
		if operand.precedence() < self.precedence() {
			write!(f, "({})", operand)
		} else {
			Display::fmt(operand, f)
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Expression::Column(column) => Display::fmt(column, f),
			Expression::Constant(constant) => Display::fmt(constant, f),
			Expression::Not(not) => {
				f.write_str("not ")?;
				self.fmt_operand(&not.expression, f)
			}
			_ => {
				let Some((left, right)) = self.operands() else {
					return Ok(());
				};
				self.fmt_operand(left, f)?;
				write!(f, " {} ", self.operator())?;
				self.fmt_operand(right, f)
			}
		}
	}
}
