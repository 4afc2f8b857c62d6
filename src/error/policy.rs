use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("malformed trust policy on role '{role}': {source}")]
    MalformedDocument {
        role: String,
        source: serde_json::Error,
    },
}

impl PolicyError {
    pub fn malformed_document(role: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedDocument {
            role: role.into(),
            source,
        }
    }
}
