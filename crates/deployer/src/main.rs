use clap::Parser;

#[tokio::main]
async fn main() {
    // A missing `.env` is fine, the variables may come from the environment.
    let dotenv = dotenvy::dotenv();
    let args = deployer::arguments::Arguments::parse();
    observe::tracing::initialize(&args.log_filter);
    if let Ok(path) = dotenv {
        tracing::debug!(?path, "loaded environment file");
    }
    tracing::info!("running deployer with validated arguments:\n{}", args);

    match deployer::start(&args).await {
        Ok(deployed) => {
            tracing::info!(
                address = %deployed.address,
                network = %args.network,
                config = ?args.config,
                "contract deployed and recorded"
            );
        }
        Err(err) => {
            tracing::error!("deployment failed: {:#}", anyhow::Error::from(err));
            std::process::exit(1);
        }
    }
}
