use clap::Args;

use crate::tracing_config::{HoneycombConfig, TracingExportConfig};

#[derive(Debug, Args)]
pub struct Config {
    #[clap(long, env, default_value_t = String::from("127.0.0.1"))]
    pub host: String,
    #[clap(short, long, env, default_value_t = 7205)]
    pub port: u16,

    /// `development` and `test` show error details in responses
    #[clap(long, env, default_value_t = String::from("production"))]
    pub env: String,

    #[clap(long = "db", env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum size of the database connection pool
    #[clap(long, env, default_value_t = 16)]
    pub db_connections: usize,

    /// Apply pending migrations before accepting requests
    #[clap(long, env)]
    pub migrate: bool,

    #[clap(long, env)]
    pub honeycomb_team: Option<String>,
    #[clap(long, env, default_value_t = String::from("dev"))]
    pub honeycomb_dataset: String,

    #[clap(long, env)]
    pub jaeger_endpoint: Option<String>,
}

impl Config {
    pub fn production(&self) -> bool {
        self.env != "development" && self.env != "test" && !cfg!(debug_assertions)
    }

    /// Take the span export settings. Honeycomb wins if both are configured.
    pub fn tracing_export(&mut self) -> TracingExportConfig {
        match (self.honeycomb_team.take(), self.jaeger_endpoint.take()) {
            (Some(team), _) => TracingExportConfig::Honeycomb(HoneycombConfig {
                team,
                dataset: std::mem::take(&mut self.honeycomb_dataset),
            }),
            (None, Some(endpoint)) => TracingExportConfig::Jaeger(endpoint),
            (None, None) => TracingExportConfig::None,
        }
    }
}
