use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Superadmin,
    Admin,
    User,
}

/// Claims carried by backend-issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: ActorRole,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub exp: u64,
}

/// The authenticated caller a session acts on behalf of.
#[derive(Clone)]
pub struct Actor {
    pub email: String,
    pub tenant_id: Option<i64>,
    pub role: ActorRole,
    pub token: String,
}

impl Actor {
    pub fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            email: claims.email,
            tenant_id: claims.company_id,
            role: claims.role,
            token,
        }
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("email", &self.email)
            .field("tenant_id", &self.tenant_id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let actor = Actor {
            email: "desk@k.com".to_string(),
            tenant_id: Some(4),
            role: ActorRole::User,
            token: "secret-token".to_string(),
        };
        let printed = format!("{actor:?}");
        assert!(printed.contains("desk@k.com"));
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn test_superadmin_claims_have_no_tenant() {
        let json = r#"{"email":"root@k.com","role":"superadmin","exp":4102444800}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        let actor = Actor::from_claims(claims, "t".to_string());
        assert_eq!(actor.role, ActorRole::Superadmin);
        assert_eq!(actor.tenant_id, None);
    }
}
