//! Deploys a compiled contract to the network configured in a TOML file and
//! records the deployed address in that same file.
//!
//! The flow is strictly linear: secrets, artifact and network config are
//! loaded and validated first, then the contract creation transaction is
//! sent, and once it is mined the configuration file is rewritten. Nothing is
//! retried and the first failure ends the run.

pub mod arguments;
pub mod artifact;
pub mod config;
pub mod deploy;
pub mod secrets;

use {
    crate::{
        arguments::Arguments,
        artifact::{ArtifactError, DeploymentArtifact},
        config::{ConfigError, Network, NetworkConfig},
        deploy::{ChainError, DeployContract, Deployed, OnchainDeployer},
        secrets::Secrets,
    },
    alloy::signers::local::LocalSignerError,
    std::path::Path,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("environment variable {0} is not set")]
    MissingSecret(&'static str),
    #[error("environment variable {0} is not a valid private key")]
    InvalidSecret(&'static str, #[source] LocalSignerError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Runs a deployment against the node configured for `args.network`, reading
/// secrets from the process environment.
pub async fn start(args: &Arguments) -> Result<Deployed, Error> {
    run(args, Secrets::from_env, OnchainDeployer::new).await
}

/// Loads and validates every input, secrets first, then calls `connect` to
/// get the deployer for the selected network. No network request can happen
/// before `connect`.
pub async fn run<S, C, D>(args: &Arguments, secrets: S, connect: C) -> Result<Deployed, Error>
where
    S: FnOnce() -> Result<Secrets, Error>,
    C: FnOnce(&Network, Secrets) -> D,
    D: DeployContract,
{
    let secrets = secrets()?;
    let artifact = DeploymentArtifact::from_path(&args.artifact).await?;
    let config = NetworkConfig::from_path(&args.config).await?;
    let network = config.network(&args.network)?;
    tracing::info!(
        network = %args.network,
        chain_id = network.chain_id,
        deployer = %secrets.address(),
        "deploying contract"
    );

    let deployer = connect(network, secrets);
    deploy_and_record(&deployer, &artifact, &config, &args.network, &args.config).await
}

/// Deploys `artifact` and overwrites `config_path` with the config returned
/// by [`NetworkConfig::with_deployment`]. The file is only written once the
/// deployment is mined.
pub async fn deploy_and_record(
    deployer: &impl DeployContract,
    artifact: &DeploymentArtifact,
    config: &NetworkConfig,
    network: &str,
    config_path: &Path,
) -> Result<Deployed, Error> {
    // Fail before spending gas on a deployment that can't be recorded.
    config.network(network)?;

    let deployed = deployer.deploy(artifact.bytecode.clone()).await?;
    tracing::info!(address = %deployed.address, tx_hash = ?deployed.tx_hash, "contract deployed");

    config
        .with_deployment(network, deployed.address)?
        .to_path(config_path)
        .await?;
    tracing::debug!(path = ?config_path, "network config updated");
    Ok(deployed)
}
