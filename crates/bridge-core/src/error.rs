use bridge_evm::ChainClientError;
use bridge_handlers::DecodeError;
use bridge_store::BlockStoreError;

#[derive(Debug, thiserror::Error)]
pub enum TransactorError {
    #[error(transparent)]
    Chain(#[from] ChainClientError),
}

#[derive(Debug, thiserror::Error)]
pub enum VoterError {
    #[error("read-only call to resolve the handler address failed: {0}")]
    HandlerResolution(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Transact(#[from] TransactorError),
}

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    #[error(transparent)]
    Store(#[from] BlockStoreError),
}
