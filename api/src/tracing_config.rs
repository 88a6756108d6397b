use opentelemetry::sdk::trace::Tracer;
use opentelemetry_otlp::WithExportConfig;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

const SERVICE_NAME: &str = "academy-api";

pub struct HoneycombConfig {
    pub team: String,
    pub dataset: String,
}

/// Where spans are sent in addition to the console.
pub enum TracingExportConfig {
    None,
    Honeycomb(HoneycombConfig),
    /// A Jaeger agent endpoint, e.g. `localhost:6831`
    Jaeger(String),
}

impl TracingExportConfig {
    fn install(self) -> Result<Option<Tracer>, anyhow::Error> {
        let tracer = match self {
            Self::None => return Ok(None),
            Self::Honeycomb(HoneycombConfig { team, dataset }) => {
                let mut metadata = tonic::metadata::MetadataMap::new();
                metadata.insert("x-honeycomb-team", team.parse()?);

                let exporter = opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint("api.honeycomb.io:443")
                    .with_metadata(metadata);
                let resource = opentelemetry::sdk::Resource::new([opentelemetry::KeyValue::new(
                    "service.name",
                    dataset,
                )]);

                opentelemetry_otlp::new_pipeline()
                    .tracing()
                    .with_trace_config(opentelemetry::sdk::trace::config().with_resource(resource))
                    .with_exporter(exporter)
                    .install_batch(opentelemetry::runtime::TokioCurrentThread)?
            }
            Self::Jaeger(endpoint) => opentelemetry_jaeger::new_pipeline()
                .with_agent_endpoint(endpoint)
                .with_service_name(SERVICE_NAME)
                .install_batch(opentelemetry::runtime::TokioCurrentThread)?,
        };

        Ok(Some(tracer))
    }
}

/// Install the global subscriber: bunyan JSON on stdout, filtered by the `LOG`
/// variable, plus the optional span exporter.
pub fn configure(export: TracingExportConfig) -> Result<(), anyhow::Error> {
    LogTracer::builder()
        .ignore_crate("rustls")
        .with_max_level(log::LevelFilter::Debug)
        .init()?;

    let tracer = export.install()?;
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            SERVICE_NAME.to_string(),
            std::io::stdout,
        ));

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Flush any spans still waiting to be exported.
pub fn teardown() {
    opentelemetry::global::shutdown_tracer_provider();
}
