use academy_auth::api_key::ApiKeyData;
use chrono::{DateTime, Utc};
use diesel::{prelude::*, PgConnection};

/// Create an API key for the given role and store its hash. The returned data
/// holds the only copy of the full key.
pub fn make_key(
    conn: &mut PgConnection,
    role: &str,
    name: Option<&str>,
    expires: Option<DateTime<Utc>>,
) -> Result<ApiKeyData, diesel::result::Error> {
    let key = ApiKeyData::new(expires);

    let new_key = academy_db::api_keys::ApiKey {
        api_key_id: key.api_key_id,
        name: name.unwrap_or("").to_string(),
        hash: key.hash.as_bytes().to_vec(),
        role: role.to_string(),
        active: true,
        created: Utc::now(),
        expires: key.expires,
    };

    diesel::insert_into(academy_db::api_keys::table)
        .values(&new_key)
        .execute(conn)?;

    Ok(key)
}
