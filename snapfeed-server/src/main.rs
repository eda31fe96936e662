use anyhow::Result;
use snapfeed_server::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env()?;
    let ax = snapfeed_server::build(&settings).await?;

    let addr = settings.addr();
    tracing::info!("snapfeed listening on http://{addr}");

    ax.listen(addr).await?;

    Ok(())
}
