use crate::core::errors::ExporterError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Signer trait for request authentication
///
/// Implementations produce the headers that authenticate one request to
/// their exchange. The exporters only ever sign GETs, so the request body
/// plays no part.
pub trait Signer: Send + Sync {
    /// Sign a request and return the headers to attach to it.
    ///
    /// # Arguments
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Query string (without leading '?')
    /// * `timestamp` - Request timestamp in milliseconds, used as the nonce
    fn sign_request(
        &self,
        endpoint: &str,
        query_string: &str,
        timestamp: u64,
    ) -> Result<HashMap<String, String>, ExporterError>;
}

/// JWT claims of the Quoine authentication scheme.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuoineClaims {
    pub path: String,
    pub nonce: u64,
    pub token_id: String,
}

/// Quoine-style JWT signer (Qryptos/Liquid).
///
/// Every authenticated request carries `X-Quoine-Auth`, an HS256 JWT over
/// the request path, a nonce, and the API token id, signed with the API
/// secret.
pub struct QuoineJwtSigner {
    token_id: String,
    secret: String,
}

impl QuoineJwtSigner {
    pub fn new(token_id: String, secret: String) -> Self {
        Self { token_id, secret }
    }
}

impl Signer for QuoineJwtSigner {
    fn sign_request(
        &self,
        endpoint: &str,
        query_string: &str,
        timestamp: u64,
    ) -> Result<HashMap<String, String>, ExporterError> {
        let path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };

        let claims = QuoineClaims {
            path,
            nonce: timestamp,
            token_id: self.token_id.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ExporterError::AuthError(format!("Failed to sign request: {}", e)))?;

        let mut headers = HashMap::new();
        headers.insert("X-Quoine-API-Version".to_string(), "2".to_string());
        headers.insert("X-Quoine-Auth".to_string(), token);
        Ok(headers)
    }
}
