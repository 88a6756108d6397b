//! Helpers for tests that need a real database. Each call to [create_database]
//! makes a fresh, migrated database with a random name.

use anyhow::{anyhow, Result};
use diesel::{pg::PgConnection, prelude::*, Connection};

use crate::{role_permissions::RolePermission, Pool};

pub const ADMIN_ROLE: &str = "admin";
pub const VIEWER_ROLE: &str = "viewer";

/// Where the test PostgreSQL server lives, read from `TEST_DATABASE_*`
/// variables with the regular `DATABASE_*` ones as a fallback.
#[derive(Clone, Debug)]
struct ServerSettings {
    base_url: String,
    /// An existing database to connect to while creating and dropping test databases.
    maintenance_db: String,
}

impl ServerSettings {
    fn from_env() -> Self {
        let var = |names: &[&str], default: &str| {
            names
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .unwrap_or_else(|| default.to_string())
        };

        let host = var(&["TEST_DATABASE_HOST", "DATABASE_HOST"], "localhost");
        let port = var(&["TEST_DATABASE_PORT", "DATABASE_PORT"], "5432");
        let user = var(&["TEST_DATABASE_USER"], "postgres");
        let password = var(&["TEST_DATABASE_PASSWORD"], "");

        ServerSettings {
            base_url: format!("postgresql://{user}:{password}@{host}:{port}"),
            maintenance_db: var(&["TEST_DATABASE_GLOBAL_DB"], "postgres"),
        }
    }

    fn url(&self, database: &str) -> String {
        format!("{}/{database}", self.base_url)
    }

    fn maintenance_conn(&self) -> Result<PgConnection> {
        Ok(PgConnection::establish(&self.url(&self.maintenance_db))?)
    }
}

#[derive(Clone)]
pub struct TestDatabase {
    pub name: String,
    pub pool: Pool,
    pub url: String,
    server: ServerSettings,
}

impl TestDatabase {
    pub fn drop_db(&self) -> Result<()> {
        diesel::sql_query(format!(r#"DROP DATABASE "{}" (FORCE)"#, self.name))
            .execute(&mut self.server.maintenance_conn()?)?;
        Ok(())
    }
}

pub async fn create_database() -> Result<TestDatabase> {
    dotenv::dotenv().ok();
    let server = ServerSettings::from_env();
    let name = format!("academy_test_{}", crate::object_id::new_uuid().simple());
    tracing::info!(database = %name, "Creating test database");

    diesel::sql_query(format!(r#"CREATE DATABASE "{name}""#))
        .execute(&mut server.maintenance_conn()?)?;

    let url = server.url(&name);
    let pool = crate::connect(&url, 4)?;
    pool.get()
        .await?
        .interact(|conn| {
            crate::run_migrations(conn).map_err(|e| anyhow!(e))?;
            populate_database(conn)
        })
        .await
        .map_err(|_| anyhow!("Database setup was interrupted"))??;

    Ok(TestDatabase {
        pool,
        url,
        name,
        server,
    })
}

/// The admin role can do anything to any project entity. The viewer role can
/// only read.
fn populate_database(conn: &mut PgConnection) -> Result<()> {
    let admin = ["create", "read", "update", "delete"]
        .into_iter()
        .map(|operation| RolePermission {
            role: ADMIN_ROLE.to_string(),
            service: "project".to_string(),
            entity: "*".to_string(),
            operation: operation.to_string(),
        });
    let viewer = std::iter::once(RolePermission {
        role: VIEWER_ROLE.to_string(),
        service: "project".to_string(),
        entity: "*".to_string(),
        operation: "read".to_string(),
    });

    let grants = admin.chain(viewer).collect::<Vec<_>>();
    diesel::insert_into(crate::role_permissions::table)
        .values(&grants)
        .execute(conn)?;

    Ok(())
}
