use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use virtual_dietitian::analyzer::MealAnalyzer;
use virtual_dietitian::cnf::CnfClient;
use virtual_dietitian::config::AppConfig;
use virtual_dietitian::dataset::FoodDataset;
use virtual_dietitian::resolver::{FoodResolver, TierSet};
use virtual_dietitian::rules::RuleEngine;
use virtual_dietitian::usda::UsdaClient;
use virtual_dietitian::webhook;

/// Initialize structured logging. Pretty output for development, JSON for
/// everything else.
fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("virtual_dietitian=info".parse()?)
        .add_directive("hyper=warn".parse()?);

    if std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()) == "pretty" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    init_tracing()?;

    // Load and validate configuration early
    let config = AppConfig::from_env()?;
    config.validate()?;
    info!(
        enable_cnf = config.resolver.enable_cnf,
        enable_usda = config.resolver.enable_usda,
        port = config.http.port,
        "Configuration validated"
    );

    // Load the nutrition dataset once; it is read-only from here on
    let dataset = Arc::new(FoodDataset::load()?);
    info!(foods = dataset.len(), "Nutrition dataset loaded");

    // One HTTP client with a bounded timeout, shared by both external tiers
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.resolver.http_timeout_secs))
        .build()
        .expect("Failed to create HTTP client");

    let mut resolver = FoodResolver::new(Arc::clone(&dataset)).with_tiers(TierSet {
        local: true,
        cnf: config.resolver.enable_cnf,
        usda: config.resolver.enable_usda,
    });

    if config.resolver.enable_cnf {
        resolver = resolver.with_cnf(Arc::new(CnfClient::new(http_client.clone())));
        info!("CNF fallback tier enabled");
    }
    if config.resolver.enable_usda {
        resolver = resolver.with_usda(Arc::new(UsdaClient::new(
            http_client.clone(),
            config.resolver.usda_api_key.clone(),
        )));
        info!("USDA fallback tier enabled");
    }

    let analyzer = Arc::new(MealAnalyzer::new(resolver, RuleEngine::with_default_rules()));

    // Install the Prometheus recorder; the webhook server exposes /metrics
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    webhook::run(
        analyzer,
        Some(metrics_handle),
        config.http.port,
        config.http.bind_all,
    )
    .await?;

    Ok(())
}
