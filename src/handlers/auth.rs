use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::AppError;
use crate::models::{Actor, Claims};

/// Resolves the bearer token into an actor. No `Authorization` header means
/// an anonymous caller; a token that does not verify is rejected.
pub fn optional_actor(headers: &HeaderMap, secret: &str) -> Result<Option<Actor>, AppError> {
    let Some(auth) = headers.get("authorization") else {
        return Ok(None);
    };

    let token = auth
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("invalid authorization header".to_string()))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected access token");
        AppError::Unauthorized("Could not validate credentials".to_string())
    })?;

    Ok(Some(Actor::from_claims(data.claims, token.to_string())))
}

pub fn require_actor(headers: &HeaderMap, secret: &str) -> Result<Actor, AppError> {
    optional_actor(headers, secret)?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;
    use crate::models::ActorRole;

    fn token(secret: &str, company_id: Option<i64>) -> String {
        let claims = Claims {
            email: "desk@k.com".to_string(),
            role: ActorRole::Admin,
            company_id,
            user_id: Some(9),
            exp: 4_102_444_800,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert!(optional_actor(&HeaderMap::new(), "s").unwrap().is_none());
        assert!(matches!(
            require_actor(&HeaderMap::new(), "s"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_valid_token_resolves_actor() {
        let raw = token("s", Some(4));
        let actor = optional_actor(&headers(&format!("Bearer {raw}")), "s")
            .unwrap()
            .unwrap();
        assert_eq!(actor.email, "desk@k.com");
        assert_eq!(actor.tenant_id, Some(4));
        assert_eq!(actor.role, ActorRole::Admin);
        assert_eq!(actor.token, raw);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let raw = token("other", Some(4));
        assert!(matches!(
            optional_actor(&headers(&format!("Bearer {raw}")), "s"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            optional_actor(&headers("Basic abc"), "s"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
