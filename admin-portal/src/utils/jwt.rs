use anyhow::Result;
use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Decode JWT claims without validation.
///
/// The token comes straight from the facility backend's login endpoint over
/// HTTPS; the portal only needs the identity fields for session storage and
/// display. Signature validation stays the backend's job.
pub fn decode_jwt_claims(token: &str) -> Result<JwtClaims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("Invalid JWT format"));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| anyhow::anyhow!("Failed to decode JWT payload: {}", e))?;

    let claims: JwtClaims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("Failed to parse JWT claims: {}", e))?;

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(payload: serde_json::Value) -> String {
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("e30.{}.sig", body)
    }

    #[test]
    fn decodes_identity_claims() {
        let token = token_for(serde_json::json!({
            "sub": "op_42",
            "email": "guard@example.com",
            "exp": 9999999999i64,
            "iat": 1754600000,
        }));

        let claims = decode_jwt_claims(&token).unwrap();
        assert_eq!(claims.sub, "op_42");
        assert_eq!(claims.email, "guard@example.com");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(decode_jwt_claims("not-a-jwt").is_err());
        assert!(decode_jwt_claims("a.!!!.c").is_err());
    }
}
