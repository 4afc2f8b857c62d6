//! Amazon States Language document checks.
//!
//! A document is valid when it parses and its schema validator reports no
//! diagnostics. Resource ARNs are treated as opaque strings: a definition
//! pointing at `arn:aws:lambda:REGION:ACCOUNT_ID:function:F` is still a
//! well-formed state machine.

mod structural;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

pub use structural::StructuralValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AslFormat {
    Json,
    Yaml,
}

impl AslFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AslFormat::Json => "json",
            AslFormat::Yaml => "yaml",
        }
    }
}

/// A problem found in a definition. `path` is a JSON pointer into the
/// parsed document; the empty string is the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AslDiagnostic {
    pub path: String,
    pub message: String,
}

impl AslDiagnostic {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AslDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Schema checks over an already parsed definition.
pub trait AslSchemaValidator: Send + Sync {
    fn validate(&self, definition: &Value) -> Vec<AslDiagnostic>;
}

/// Text format plus the validator the text is checked against.
pub struct AslDocument<V = StructuralValidator> {
    format: AslFormat,
    validator: V,
}

impl AslDocument<StructuralValidator> {
    pub fn new(format: AslFormat) -> Self {
        Self::with_validator(format, StructuralValidator)
    }
}

impl<V: AslSchemaValidator> AslDocument<V> {
    pub fn with_validator(format: AslFormat, validator: V) -> Self {
        Self { format, validator }
    }

    pub fn format(&self) -> AslFormat {
        self.format
    }

    pub fn parse(&self, text: &str) -> Result<Value, AslDiagnostic> {
        let parsed: Result<Value, String> = match self.format {
            AslFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            AslFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| {
            AslDiagnostic::new("", format!("invalid {}: {message}", self.format.as_str()))
        })
    }

    pub fn diagnostics(&self, text: &str) -> Vec<AslDiagnostic> {
        match self.parse(text) {
            Ok(definition) => self.validator.validate(&definition),
            Err(diagnostic) => vec![diagnostic],
        }
    }
}

pub fn is_document_valid<V: AslSchemaValidator>(text: &str, document: &AslDocument<V>) -> bool {
    let diagnostics = document.diagnostics(text);
    for diagnostic in &diagnostics {
        tracing::debug!(%diagnostic, "asl diagnostic");
    }
    diagnostics.is_empty()
}
