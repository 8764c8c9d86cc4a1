use alloy_primitives::U256;
use alloy_provider::Provider;
use async_trait::async_trait;

use crate::error::ChainClientError;

/// Determines the gas price(s) to attach to the next transaction.
///
/// A legacy pricer returns a single value (`gasPrice`); an EIP-1559 pricer
/// returns two (`maxFeePerGas`, `maxPriorityFeePerGas`), mirroring the
/// original `evmgaspricer.GasPriceClient` abstraction, which always returned
/// a slice so both styles fit the same interface.
#[async_trait]
pub trait GasPricer: Send + Sync {
    async fn gas_price(&self) -> Result<Vec<U256>, ChainClientError>;
}

/// Queries the node's `eth_gasPrice` on every call. No local caching: a
/// busy chain's price can move between two transactions a few seconds apart.
pub struct LegacyGasPricer<P> {
    provider: P,
}

impl<P> LegacyGasPricer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> GasPricer for LegacyGasPricer<P>
where
    P: Provider + Send + Sync,
{
    async fn gas_price(&self) -> Result<Vec<U256>, ChainClientError> {
        let price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|err| ChainClientError::GasPrice(err.to_string()))?;
        Ok(vec![U256::from(price)])
    }
}

/// Queries `eth_feeHistory`-derived EIP-1559 fee estimates.
pub struct Eip1559GasPricer<P> {
    provider: P,
}

impl<P> Eip1559GasPricer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> GasPricer for Eip1559GasPricer<P>
where
    P: Provider + Send + Sync,
{
    async fn gas_price(&self) -> Result<Vec<U256>, ChainClientError> {
        let estimate = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|err| ChainClientError::GasPrice(err.to_string()))?;
        Ok(vec![
            U256::from(estimate.max_fee_per_gas),
            U256::from(estimate.max_priority_fee_per_gas),
        ])
    }
}
