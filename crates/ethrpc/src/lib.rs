mod instrumentation;

use {
    alloy::{
        network::EthereumWallet,
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Creates a provider that talks to the node at `url` over HTTP and signs
/// outgoing transactions with `wallet`.
///
/// Nonce, gas and chain ID are filled in by alloy's recommended fillers for
/// every field the caller leaves empty. No retries and no timeouts are added
/// on top of the HTTP client defaults.
pub fn provider_with_signer(url: &Url, wallet: EthereumWallet) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}

/// Provider that answers each request with the next response queued in
/// `asserter`. No fillers are installed, so every provider call sends exactly
/// the requests it names and signing is left to the mocked node.
#[cfg(any(test, feature = "test-util"))]
pub fn mock_provider(asserter: alloy::providers::mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter)
        .erased()
}
