//! Secrets are read from the process environment (after `.env` was loaded)
//! and never end up in logs or on disk.

use {
    crate::Error,
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    std::fmt,
};

/// Hex encoded secp256k1 key of the deploying account, `0x` prefix optional.
/// This is the only required variable.
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";

pub struct Secrets {
    signer: PrivateKeySigner,
}

impl Secrets {
    pub fn from_env() -> Result<Self, Error> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Loads the secrets through `lookup`. A required variable that is unset
    /// or blank fails the load before anything is parsed.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let private_key = required(&lookup, PRIVATE_KEY)?;
        let signer = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|err| Error::InvalidSecret(PRIVATE_KEY, err))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn into_signer(self) -> PrivateKeySigner {
        self.signer
    }
}

fn required(lookup: impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, Error> {
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingSecret(key))
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("address", &self.address())
            .field("private_key", &"SECRET")
            .finish()
    }
}
