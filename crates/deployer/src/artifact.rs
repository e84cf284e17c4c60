use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// Compiler output of the contract to deploy.
#[derive(Debug, Clone)]
pub struct DeploymentArtifact {
    pub abi: JsonAbi,
    /// Creation code, sent as the input of the deployment transaction.
    pub bytecode: Bytes,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact is not a JSON object with valid `abi` and `bytecode` fields")]
    Malformed(#[from] serde_json::Error),
    #[error("artifact ABI is empty")]
    EmptyAbi,
    #[error("artifact bytecode is empty")]
    EmptyBytecode,
    #[error("constructor takes {0} argument(s) but the contract is deployed without any")]
    ConstructorArguments(usize),
}

#[derive(Deserialize)]
struct RawArtifact {
    abi: JsonAbi,
    bytecode: RawBytecode,
}

/// solc and hardhat emit the bytecode as a hex string, foundry nests it in an
/// object next to the source map.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

impl DeploymentArtifact {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ArtifactError::Read {
                path: path.to_owned(),
                source,
            })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let bytecode = match raw.bytecode {
            RawBytecode::Hex(bytes) | RawBytecode::Object { object: bytes } => bytes,
        };
        Self {
            abi: raw.abi,
            bytecode,
        }
        .validate()
    }

    fn validate(self) -> Result<Self, ArtifactError> {
        if self.abi.items().next().is_none() {
            return Err(ArtifactError::EmptyAbi);
        }
        if self.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode);
        }
        let constructor_inputs = self
            .abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len());
        if constructor_inputs > 0 {
            return Err(ArtifactError::ConstructorArguments(constructor_inputs));
        }
        Ok(self)
    }
}
