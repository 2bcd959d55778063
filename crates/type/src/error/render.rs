// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use super::diagnostic::Diagnostic;

pub struct DefaultRenderer;

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		let mut output = String::new();
		Self::render(&mut output, diagnostic, 0);
		output
	}

	fn render(output: &mut String, diagnostic: &Diagnostic, depth: usize) {
		let indent = "  ".repeat(depth);
		let _ = writeln!(output, "{}Error {}: {}", indent, diagnostic.code, diagnostic.message);

		if let Some(statement) = &diagnostic.statement {
			let _ = writeln!(output, "{}  --> {}", indent, statement);
		}

		if !diagnostic.fragment.is_none() {
			let _ = writeln!(output, "{}   | {}", indent, diagnostic.fragment.text());
			if let Some(label) = &diagnostic.label {
				let _ = writeln!(output, "{}   = {}", indent, label);
			}
		}

		if let Some(help) = &diagnostic.help {
			let _ = writeln!(output, "{}help: {}", indent, help);
		}

		for note in &diagnostic.notes {
			let _ = writeln!(output, "{}note: {}", indent, note);
		}

		if let Some(cause) = &diagnostic.cause {
			let _ = writeln!(output, "{}caused by:", indent);
			Self::render(output, cause, depth + 1);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fragment::Fragment;

	#[test]
	fn test_render_with_cause() {
		let inner = Diagnostic {
			code: "TABLE_002".to_string(),
			message: "row not found".to_string(),
			..Default::default()
		};
		let outer = Diagnostic {
			code: "JOIN_002".to_string(),
			message: "unknown identifier".to_string(),
			fragment: Fragment::statement("a.x"),
			label: Some("not a column of a".to_string()),
			help: Some("check the column name".to_string()),
			notes: vec!["columns are case sensitive".to_string()],
			cause: Some(Box::new(inner)),
			..Default::default()
		};

		let rendered = DefaultRenderer::render_string(&outer);
		assert!(rendered.starts_with("Error JOIN_002: unknown identifier\n"));
		assert!(rendered.contains("   | a.x\n"));
		assert!(rendered.contains("help: check the column name\n"));
		assert!(rendered.contains("note: columns are case sensitive\n"));
		assert!(rendered.contains("  Error TABLE_002: row not found\n"));
	}
}
