use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

/// Access tokens cover a school day.
const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        Self {
            sub: user.id,
            name: user.username.clone(),
            role: user.role,
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn professor() -> User {
        User {
            id: 42,
            username: "prof.reyes".to_string(),
            password_hash: String::new(),
            role: Role::Professor,
            course_id: Some("BSIT".to_string()),
            profile_image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_carries_identity_and_role() {
        let token = encode_token(&Claims::for_user(&professor()), "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.name, "prof.reyes");
        assert_eq!(claims.role, Role::Professor);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_token(&Claims::for_user(&professor()), "secret").unwrap();
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::for_user(&professor());
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
