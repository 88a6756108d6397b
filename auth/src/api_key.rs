use async_trait::async_trait;
use axum::{http::Request, response::IntoResponse};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{event, instrument, Level};
use uuid::Uuid;

use crate::{error::Error, extract_bearer_auth_value};

const KEY_PREFIX: &str = "ak1";
const KEY_LENGTH: usize = 49;

pub type Hash = blake3::Hash;

/// A newly generated key. `key` is only ever shown to the user once; the
/// database keeps `hash`.
pub struct ApiKeyData {
    pub api_key_id: Uuid,
    pub key: String,
    pub hash: Hash,
    pub expires: Option<DateTime<Utc>>,
}

impl ApiKeyData {
    pub fn new(expires: Option<DateTime<Utc>>) -> ApiKeyData {
        let id = Uuid::new_v4();
        let base64_id = URL_SAFE_NO_PAD.encode(id.as_bytes());
        let random = URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes());
        let key = format!("{KEY_PREFIX}.{base64_id}.{random}");
        let hash = hash_key(&key);

        ApiKeyData {
            api_key_id: id,
            key,
            hash,
            expires,
        }
    }
}

pub fn hash_key(key: &str) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(key.as_bytes());
    hasher.finalize()
}

/// Split a key into its ID and the hash of the whole key.
pub fn decode_key(key: &str) -> Result<(Uuid, Hash), Error> {
    if key.len() != KEY_LENGTH {
        return Err(Error::InvalidApiKeyFormat);
    }

    let mut parts = key.split('.');
    if parts.next() != Some(KEY_PREFIX) {
        return Err(Error::InvalidApiKeyFormat);
    }

    let id_portion = parts.next().ok_or(Error::InvalidApiKeyFormat)?;
    let api_key_bytes = URL_SAFE_NO_PAD
        .decode(id_portion.as_bytes())
        .map_err(|_| Error::InvalidApiKeyFormat)?;
    let api_key_id = Uuid::from_slice(&api_key_bytes).map_err(|_| Error::InvalidApiKeyFormat)?;

    Ok((api_key_id, hash_key(key)))
}

#[derive(Deserialize)]
struct ApiQueryString {
    api_key: String,
}

#[async_trait]
pub trait ApiKeyStore: Clone + Send + Sync + 'static {
    type FetchData: Send + Sync + 'static;
    type Error: From<crate::Error> + IntoResponse + Send + 'static;

    async fn lookup_api_key(
        &self,
        key_id: &Uuid,
        hash: &Hash,
    ) -> Result<Self::FetchData, Self::Error>;
}

#[derive(Clone)]
pub struct ApiKeyManager<STORE: ApiKeyStore> {
    pub store: STORE,
}

impl<STORE: ApiKeyStore> ApiKeyManager<STORE> {
    pub fn new(store: STORE) -> Self {
        ApiKeyManager { store }
    }

    #[instrument(level = "DEBUG", skip(self, key))]
    pub async fn lookup(&self, key: &str) -> Result<STORE::FetchData, STORE::Error> {
        let (api_key_id, hash) = decode_key(key)?;
        event!(Level::DEBUG, %api_key_id, "checking key");
        self.store.lookup_api_key(&api_key_id, &hash).await
    }
}

/// Find an API key in the `api_key` query parameter or the bearer token.
pub fn extract_api_key<B>(req: &Request<B>) -> Result<Option<String>, Error> {
    if let Some(query) = req.uri().query() {
        if let Ok(q) = serde_urlencoded::from_str::<ApiQueryString>(query) {
            event!(Level::DEBUG, "Got key from query string");
            return Ok(Some(q.api_key));
        }
    }

    let key = extract_bearer_auth_value(req)?;
    if key.is_some() {
        event!(Level::DEBUG, "Got key from auth header");
    }
    Ok(key)
}
