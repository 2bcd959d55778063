// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{error::diagnostic::Diagnostic, fragment::Fragment};

pub fn encode_failed(what: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SERDE_001".to_string(),
		statement: None,
		message: format!("Failed to encode {}: {}", what, reason.into()),
		fragment: Fragment::None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn decode_failed(what: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SERDE_002".to_string(),
		statement: None,
		message: format!("Failed to decode {}: {}", what, reason.into()),
		fragment: Fragment::None,
		label: None,
		help: Some("The bytes were produced by an incompatible version or are corrupt".to_string()),
		notes: vec![],
		cause: None,
	}
}
