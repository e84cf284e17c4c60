use {
    alloy::primitives::Address,
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        ffi::OsString,
        fmt,
        path::{Path, PathBuf},
        str::FromStr,
    },
    thiserror::Error,
    url::Url,
};

/// Network configuration file shared with other tooling, e.g.
///
/// ```toml
/// [networks.sonic]
/// url = "https://rpc.soniclabs.com"
/// chainId = 146
/// address = "0x..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub networks: BTreeMap<String, Network>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub url: RpcUrl,
    /// Used for replay protection when signing. It is not compared against
    /// the chain ID reported by the node.
    pub chain_id: u64,
    /// Address of the latest deployment on this network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// JSON-RPC endpoint. It is validated when the config is loaded but written
/// back byte for byte, other tooling reads the same file.
///
/// Often contains an API key, so `Debug` only shows scheme and host.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct RpcUrl {
    raw: String,
    parsed: Url,
}

impl RpcUrl {
    /// The URL as written in the config file.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl TryFrom<String> for RpcUrl {
    type Error = url::ParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let parsed = Url::parse(&raw)?;
        Ok(Self { raw, parsed })
    }
}

impl FromStr for RpcUrl {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<RpcUrl> for String {
    fn from(url: RpcUrl) -> Self {
        url.raw
    }
}

impl fmt::Debug for RpcUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RpcUrl({}://{})",
            self.parsed.scheme(),
            self.parsed.host_str().unwrap_or_default()
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read network config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML network config at {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("network {0:?} is not configured")]
    UnknownNetwork(String),
    #[error("failed to render network config")]
    Render(#[from] toml::ser::Error),
    #[error("failed to write network config {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NetworkConfig {
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        toml::from_str(&data).map_err(|err| ConfigError::Parse {
            path: path.to_owned(),
            // The parse error quotes the offending line which may be an RPC
            // URL with an API key in it.
            reason: if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") {
                err.to_string()
            } else {
                "set TOML_TRACE_ERROR=1 to print the parsing error but this may leak secrets"
                    .to_owned()
            },
        })
    }

    /// Overwrites `path` with this config. Nothing of the previous file
    /// content is kept.
    ///
    /// The config is written to `<path>.tmp` first and renamed over `path`,
    /// so a failed write never leaves a truncated config behind.
    pub async fn to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let data = toml::to_string_pretty(self)?;
        let write_error = |source| ConfigError::Write {
            path: path.to_owned(),
            source,
        };

        let mut temp_path = OsString::from(path);
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(write_error)?;
        if let Err(err) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(err));
        }
        Ok(())
    }

    pub fn network(&self, name: &str) -> Result<&Network, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_owned()))
    }

    /// Returns the config to persist after deploying to `name`: only that
    /// network, with its URL and chain ID carried over and `address` set.
    /// Other networks are dropped.
    pub fn with_deployment(&self, name: &str, address: Address) -> Result<Self, ConfigError> {
        let network = self.network(name)?;
        Ok(Self {
            networks: BTreeMap::from([(
                name.to_owned(),
                Network {
                    url: network.url.clone(),
                    chain_id: network.chain_id,
                    address: Some(address),
                },
            )]),
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address};

    const CONFIG: &str = r#"
[networks.sonic]
url = "https://rpc.soniclabs.com"
chainId = 146

[networks.sonic-testnet]
url = "https://rpc.testnet.soniclabs.com"
chainId = 14601
address = "0x1111111111111111111111111111111111111111"
"#;

    #[test]
    fn parses_networks() {
        let config: NetworkConfig = toml::from_str(CONFIG).unwrap();

        let sonic = config.network("sonic").unwrap();
        assert_eq!(sonic.url.as_str(), "https://rpc.soniclabs.com");
        assert_eq!(sonic.url.url().as_str(), "https://rpc.soniclabs.com/");
        assert_eq!(sonic.chain_id, 146);
        assert_eq!(sonic.address, None);
        assert_eq!(
            config.network("sonic-testnet").unwrap().address,
            Some(address!("1111111111111111111111111111111111111111"))
        );
        assert!(matches!(
            config.network("mainnet"),
            Err(ConfigError::UnknownNetwork(name)) if name == "mainnet"
        ));
    }

    #[test]
    fn deployment_keeps_only_target_network() {
        let config: NetworkConfig = toml::from_str(CONFIG).unwrap();
        let deployed = address!("2222222222222222222222222222222222222222");

        let updated = config.with_deployment("sonic", deployed).unwrap();

        assert_eq!(updated.networks.len(), 1);
        assert_eq!(
            updated.network("sonic").unwrap(),
            &Network {
                url: "https://rpc.soniclabs.com".parse().unwrap(),
                chain_id: 146,
                address: Some(deployed),
            }
        );
        // The loaded value is untouched.
        assert_eq!(config.network("sonic").unwrap().address, None);
    }

    #[test]
    fn unknown_network_has_no_deployment() {
        let config: NetworkConfig = toml::from_str(CONFIG).unwrap();

        assert!(matches!(
            config.with_deployment("mainnet", Address::ZERO),
            Err(ConfigError::UnknownNetwork(_))
        ));
    }

    #[tokio::test]
    async fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, CONFIG).await.unwrap();

        let config = NetworkConfig::from_path(&path).await.unwrap();
        config
            .with_deployment("sonic-testnet", Address::ZERO)
            .unwrap()
            .to_path(&path)
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("[networks.sonic-testnet]"));
        assert!(written.contains("chainId = 14601"));
        assert!(!written.contains("[networks.sonic]"));
        assert!(!dir.path().join("config.toml.tmp").exists());
    }

    #[tokio::test]
    async fn url_is_written_back_as_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let url = "HTTPS://RPC.SonicLabs.com:443";
        tokio::fs::write(&path, format!("[networks.sonic]\nurl = \"{url}\"\nchainId = 146\n"))
            .await
            .unwrap();

        NetworkConfig::from_path(&path)
            .await
            .unwrap()
            .with_deployment("sonic", Address::ZERO)
            .unwrap()
            .to_path(&path)
            .await
            .unwrap();

        let written: toml::Table =
            toml::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["networks"]["sonic"]["url"].as_str(), Some(url));
        let config = NetworkConfig::from_path(&path).await.unwrap();
        assert_eq!(
            config.network("sonic").unwrap().url.url().as_str(),
            "https://rpc.soniclabs.com/"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let config = "[networks.sonic]\nurl = \"rpc.soniclabs.com\"\nchainId = 146\n";

        assert!(toml::from_str::<NetworkConfig>(config).is_err());
    }

    #[test]
    fn url_debug_hides_path() {
        let url: RpcUrl = "https://mainnet.infura.io/v3/0123456789abcdef".parse().unwrap();

        let debug = format!("{url:?}");

        assert_eq!(debug, "RpcUrl(https://mainnet.infura.io)");
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, CONFIG).await.unwrap();
        // Occupy the temporary file name so the new config can't be written.
        tokio::fs::create_dir(dir.path().join("config.toml.tmp"))
            .await
            .unwrap();

        let config = NetworkConfig::from_path(&path).await.unwrap();
        let result = config
            .with_deployment("sonic", Address::ZERO)
            .unwrap()
            .to_path(&path)
            .await;

        assert!(matches!(result, Err(ConfigError::Write { .. })));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), CONFIG);
    }

    #[tokio::test]
    async fn parse_error_does_not_leak_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[networks.sonic]\nurl = https://key@rpc")
            .await
            .unwrap();

        let err = NetworkConfig::from_path(&path).await.unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        if std::env::var("TOML_TRACE_ERROR").is_err() {
            assert!(!err.to_string().contains("key@rpc"));
        }
    }
}
