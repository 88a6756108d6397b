use academy_api::{config::Config, tracing_config};

pub async fn run(mut config: Config) -> Result<(), anyhow::Error> {
    tracing_config::configure(config.tracing_export())?;

    // The exporter is flushed even when startup fails.
    let result = serve(config).await;
    tracing_config::teardown();
    result
}

async fn serve(config: Config) -> Result<(), anyhow::Error> {
    let server = academy_api::create_server(config).await?;
    server.run().await?;
    Ok(())
}
