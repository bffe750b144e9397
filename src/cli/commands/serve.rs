use crate::config::config;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting UCSB API in {:?} mode", config.environment);

    if crate::is_development!() {
        tracing::info!("Mint a local bearer token with: ucsb-api token --email <you@ucsb.edu> --admin");
    }

    crate::app::serve(config, port).await
}
