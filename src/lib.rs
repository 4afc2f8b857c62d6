/// Toolkit Assist
///
/// Step Functions authoring helpers: a local cache for the state machine
/// graph assets, trust policy and ASL definition checks, and tracking of
/// security findings across document edits.
pub mod asl;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod issues;
pub mod logging;
pub mod policy;

pub use asl::{is_document_valid, AslDocument, AslFormat};
pub use cache::{AssetCache, AssetSpec};
pub use error::{Error, Result};
pub use issues::{DocumentChangeEvent, SecurityIssue, SecurityIssueProvider};
pub use policy::{is_step_functions_role, IamRole, PolicyDocument};
