use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

pub use crate::schema::api_keys::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = crate::schema::api_keys)]
#[diesel(primary_key(api_key_id))]
pub struct ApiKey {
    pub api_key_id: Uuid,
    pub name: String,
    /// blake3 hash of the full key. The key itself is never stored.
    pub hash: Vec<u8>,
    pub role: String,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub expires: Option<DateTime<Utc>>,
}

/// Find the role of an active, unexpired key with a matching hash.
pub fn lookup_role(
    conn: &mut PgConnection,
    key_id: &Uuid,
    key_hash: &[u8],
) -> Result<Option<String>, diesel::result::Error> {
    table
        .select(role)
        .filter(api_key_id.eq(key_id))
        .filter(hash.eq(key_hash))
        .filter(active)
        .filter(expires.is_null().or(expires.gt(Utc::now())))
        .first::<String>(conn)
        .optional()
}
