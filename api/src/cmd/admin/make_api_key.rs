use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use diesel::{Connection, PgConnection};

#[derive(Debug, Args)]
pub struct MakeApiKeyArgs {
    #[clap(short, long, help = "The role whose permissions the key carries")]
    role: String,
    #[clap(short, long, help = "Database connection string", env = "DATABASE_URL")]
    database: String,
    #[clap(short, long, help = "When the API key will expire")]
    expires: Option<DateTime<Utc>>,
    #[clap(short, long, help = "A name for the API key")]
    name: Option<String>,
}

pub fn main(args: MakeApiKeyArgs) -> Result<()> {
    let mut conn = PgConnection::establish(args.database.as_str())?;
    let key = academy_api::api_key::make_key(
        &mut conn,
        args.role.as_str(),
        args.name.as_deref(),
        args.expires,
    )?;

    println!("Key ID: {}", key.api_key_id);
    println!("Key: {}", key.key);
    Ok(())
}
