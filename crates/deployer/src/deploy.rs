use {
    crate::{config::Network, secrets::Secrets},
    alloy::{
        network::{EthereumWallet, ReceiptResponse as _, TransactionBuilder as _},
        primitives::{Address, Bytes, TxHash},
        providers::{PendingTransactionError, Provider as _},
        rpc::types::TransactionRequest,
        signers::Signer as _,
        transports::TransportError,
    },
    ethrpc::AlloyProvider,
    thiserror::Error,
};

/// A contract creation transaction that got mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub tx_hash: TxHash,
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("failed to submit the contract creation transaction")]
    Submit(#[source] TransportError),
    #[error("failed while waiting for the deployment transaction to be mined")]
    Confirmation(#[source] PendingTransactionError),
    #[error("deployment transaction {0} reverted")]
    Reverted(TxHash),
    #[error("receipt of deployment transaction {0} has no contract address")]
    MissingAddress(TxHash),
}

/// Abstracts the on-chain part of a deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DeployContract: Send + Sync {
    /// Submits a contract creation transaction with `code` as input and waits
    /// until it is mined in one block. There is no timeout.
    async fn deploy(&self, code: Bytes) -> Result<Deployed, ChainError>;
}

/// Deploys through a node's JSON-RPC API, signing locally.
pub struct OnchainDeployer {
    provider: AlloyProvider,
    from: Address,
    chain_id: u64,
}

impl OnchainDeployer {
    /// Does not send any request, the first one goes out on
    /// [`DeployContract::deploy`].
    pub fn new(network: &Network, secrets: Secrets) -> Self {
        let signer = secrets
            .into_signer()
            .with_chain_id(Some(network.chain_id));
        let from = signer.address();
        let provider = ethrpc::provider_with_signer(network.url.url(), EthereumWallet::new(signer));
        Self::with_provider(provider, from, network.chain_id)
    }

    /// Deploys from `from` through `provider`, which is expected to sign for
    /// that account.
    pub fn with_provider(provider: AlloyProvider, from: Address, chain_id: u64) -> Self {
        Self {
            provider,
            from,
            chain_id,
        }
    }

    fn creation_tx(&self, code: Bytes) -> TransactionRequest {
        // Setting the chain ID here keeps the filler from asking the node.
        TransactionRequest::default()
            .with_from(self.from)
            .with_chain_id(self.chain_id)
            .with_deploy_code(code)
    }
}

#[async_trait::async_trait]
impl DeployContract for OnchainDeployer {
    async fn deploy(&self, code: Bytes) -> Result<Deployed, ChainError> {
        let pending = self
            .provider
            .send_transaction(self.creation_tx(code))
            .await
            .map_err(ChainError::Submit)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(?tx_hash, "deployment transaction submitted");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(ChainError::Confirmation)?;
        tracing::debug!(?tx_hash, block = ?receipt.block_number(), "deployment transaction mined");
        if !receipt.status() {
            return Err(ChainError::Reverted(tx_hash));
        }
        let address = receipt
            .contract_address()
            .ok_or(ChainError::MissingAddress(tx_hash))?;
        Ok(Deployed { address, tx_hash })
    }
}
