use {clap::Parser, std::path::PathBuf};

/// Every argument has a default so the deployer can be run without any. The
/// private key is intentionally not an argument, see [`crate::secrets`].
#[derive(Debug, Parser)]
pub struct Arguments {
    /// Network configuration file. It is read on startup and fully rewritten
    /// with the deployed contract address once the deployment is confirmed.
    #[clap(long, env, default_value = "config.toml")]
    pub config: PathBuf,

    /// Compiled contract artifact, a JSON file with `abi` and `bytecode`
    /// fields.
    #[clap(long, env, default_value = "metadata.json")]
    pub artifact: PathBuf,

    /// Name of the entry under `networks` in the configuration file to deploy
    /// to.
    #[clap(long, env, default_value = "sonic")]
    pub network: String,

    /// Tracing filter directives, e.g. `warn,deployer=debug,ethrpc=trace`.
    #[clap(long, env, default_value = "warn,deployer=info,ethrpc=info")]
    pub log_filter: String,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "config: {:?}", self.config)?;
        writeln!(f, "artifact: {:?}", self.artifact)?;
        writeln!(f, "network: {}", self.network)?;
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "private_key: SECRET")
    }
}
