//! IAM trust policy inspection.

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

pub const STEP_FUNCTIONS_SERVICE_PRINCIPAL: &str = "states.amazonaws.com";

/// A role as returned by IAM (`GetRole` / `ListRoles`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IamRole {
    pub role_name: String,
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<PolicyDocument>,
}

/// A trust policy as it appears on a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyDocument {
    /// JSON text. The IAM query API URL-encodes it (`%7B%22Version...`).
    Encoded(String),
    /// Already decoded, as printed by `aws iam list-roles`.
    Inline(serde_json::Value),
}

impl PolicyDocument {
    pub fn trust_policy(&self) -> serde_json::Result<TrustPolicy> {
        match self {
            Self::Encoded(text) => match percent_decode(text) {
                Some(decoded) => TrustPolicy::parse(&decoded),
                None => TrustPolicy::parse(text),
            },
            Self::Inline(value) => TrustPolicy::deserialize(value),
        }
    }
}

impl From<&str> for PolicyDocument {
    fn from(text: &str) -> Self {
        Self::Encoded(text.to_string())
    }
}

/// Decodes `%XX` escapes in a URL-encoded JSON object. Anything that does not
/// start with an encoded `{`, or does not decode to UTF-8, is left to the JSON
/// parser as is.
fn percent_decode(text: &str) -> Option<String> {
    if !text.get(..3)?.eq_ignore_ascii_case("%7B") {
        return None;
    }

    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

/// `aws iam list-roles` output, or a bare array of roles.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RoleListing {
    #[serde(rename_all = "PascalCase")]
    Listing { roles: Vec<IamRole> },
    Bare(Vec<IamRole>),
}

pub fn parse_role_list(json: &str) -> serde_json::Result<Vec<IamRole>> {
    Ok(match serde_json::from_str::<RoleListing>(json)? {
        RoleListing::Listing { roles } | RoleListing::Bare(roles) => roles,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustPolicy {
    #[serde(default)]
    pub statement: Option<OneOrMany<Statement>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub principal: Option<Principal>,
    #[serde(default)]
    pub action: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    /// `"Principal": "*"`
    Wildcard(String),
    Entities(PrincipalEntities),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrincipalEntities {
    #[serde(default)]
    pub service: Option<OneOrMany<String>>,
}

impl Statement {
    pub fn services(&self) -> &[String] {
        match &self.principal {
            Some(Principal::Entities(PrincipalEntities {
                service: Some(services),
            })) => services.as_slice(),
            _ => &[],
        }
    }
}

impl TrustPolicy {
    pub fn parse(document: &str) -> serde_json::Result<Self> {
        serde_json::from_str(document)
    }

    pub fn statements(&self) -> &[Statement] {
        self.statement
            .as_ref()
            .map_or(&[] as &[Statement], OneOrMany::as_slice)
    }

    pub fn trusts_service(&self, service: &str) -> bool {
        self.statements()
            .iter()
            .any(|statement| statement.services().iter().any(|s| s == service))
    }
}

/// Whether Step Functions may assume `role`. Only the principal is
/// inspected; `Effect` and `Action` are ignored. A role without a trust
/// policy is not a Step Functions role; an unparsable one is an error.
pub fn is_step_functions_role(role: &IamRole) -> Result<bool, PolicyError> {
    let Some(document) = &role.assume_role_policy_document else {
        return Ok(false);
    };

    let policy = document
        .trust_policy()
        .map_err(|e| PolicyError::malformed_document(&role.role_name, e))?;

    Ok(policy.trusts_service(STEP_FUNCTIONS_SERVICE_PRINCIPAL))
}

pub fn step_functions_roles(roles: &[IamRole]) -> Result<Vec<&IamRole>, PolicyError> {
    let mut matching = Vec::new();
    for role in roles {
        if is_step_functions_role(role)? {
            matching.push(role);
        }
    }
    Ok(matching)
}
