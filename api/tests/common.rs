use academy_api::Server;
use academy_client::{ApiClient, ClientConfig};
use academy_db::test::{create_database, TestDatabase, ADMIN_ROLE, VIEWER_ROLE};
use academy_models::{
    academy::Academy, coach::Coach, object_id::AcademyId, player::Player, team::Team,
};
use anyhow::{anyhow, Result};
use futures::Future;
use once_cell::sync::Lazy;

pub struct TestApp {
    pub database: TestDatabase,
    /// A client with no API key.
    pub client: ApiClient,
    /// Authenticated with a key whose role can do everything.
    pub admin: ApiClient,
    /// Authenticated with a key whose role can only read.
    pub viewer: ApiClient,
    pub base_url: String,
}

async fn start_app(database: TestDatabase) -> Result<TestApp> {
    let config = academy_api::config::Config {
        database_url: database.url.clone(),
        port: 0, // Bind to random port
        host: "127.0.0.1".to_string(),
        env: "test".to_string(),
        db_connections: 4,
        migrate: false,
        honeycomb_team: None,
        honeycomb_dataset: String::new(),
        jaeger_endpoint: None,
    };
    Lazy::force(&academy_test::TRACING);
    let Server { server, host, port } = academy_api::create_server(config).await?;

    tokio::task::spawn(server);

    let base_url = format!("http://{}:{}", host, port);
    let client = ApiClient::new(ClientConfig::new(base_url.clone()))?;

    let conn = database.pool.get().await?;
    let (admin_key, viewer_key) = conn
        .interact(|conn| {
            let admin = academy_api::api_key::make_key(conn, ADMIN_ROLE, Some("admin"), None)?;
            let viewer = academy_api::api_key::make_key(conn, VIEWER_ROLE, None, None)?;
            Ok::<_, diesel::result::Error>((admin.key, viewer.key))
        })
        .await
        .map_err(|_| anyhow!("Creating API keys was interrupted"))??;

    Ok(TestApp {
        database,
        admin: client.clone_with_api_key(admin_key),
        viewer: client.clone_with_api_key(viewer_key),
        client,
        base_url,
    })
}

pub async fn run_app_test<F, R>(f: F)
where
    F: FnOnce(TestApp) -> R,
    R: Future<Output = Result<(), anyhow::Error>>,
{
    let database = create_database().await.expect("Creating database");
    let app = start_app(database.clone()).await.expect("Starting app");
    f(app).await.unwrap();
    database.drop_db().expect("Cleaning up");
}

impl TestApp {
    pub async fn add_academy(&self, name: &str) -> Result<Academy> {
        Ok(self
            .admin
            .resource::<Academy>()
            .create(&Academy::new(name, "owner-1"))
            .await?)
    }

    pub async fn add_team(&self, name: &str, academy_id: AcademyId) -> Result<Team> {
        Ok(self
            .admin
            .resource::<Team>()
            .create(&Team::new(name, academy_id))
            .await?)
    }

    /// An academy with one team, which has a coach and the given players.
    pub async fn add_roster(
        &self,
        players: &[&str],
    ) -> Result<(Academy, Team, Coach, Vec<Player>)> {
        let academy = self.add_academy(&academy_test::unique_name("academy")).await?;
        let team = self.add_team("U12 Falcons", academy.id.unwrap()).await?;
        let team_id = team.id.unwrap();

        let coach = self
            .admin
            .resource::<Coach>()
            .create(&Coach::new("coach-1", team_id))
            .await?;

        let player_client = self.admin.resource::<Player>();
        let mut created = Vec::with_capacity(players.len());
        for user_id in players {
            created.push(player_client.create(&Player::new(*user_id, team_id)).await?);
        }

        Ok((academy, team, coach, created))
    }
}
