#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    #[error("at least one signer is required to construct a chain client")]
    NoSigners,
    #[error("rpc transport error: {0}")]
    Transport(#[from] alloy_transport::TransportError),
    #[error("failed to sign transaction: {0}")]
    Signer(#[from] alloy_signer::Error),
    #[error("transaction {hash} failed on-chain, status={status}")]
    TransactionFailed { hash: String, status: u64 },
    #[error("transaction {0} did not appear after the retry budget was exhausted")]
    ReceiptTimeout(String),
    #[error("could not determine a pending nonce after the retry budget was exhausted")]
    NonceUnavailable,
    #[error("gas price unavailable: {0}")]
    GasPrice(String),
}
