#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use pert_cpm::http_api::{self, HttpConfig};
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pert_cpm=info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = HttpConfig::from_env()?;
    println!("pert-cpm HTTP API listening on http://{}", config.addr);
    http_api::serve(config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
