// services/tx/simulation/simulation_service.rs

use crate::errors::error::AppError;
use crate::infrastructure::provider::ProviderTrait;
use crate::services::tx::types::TxContext;
use ethers_core::types::TransactionRequest;

/// 广播前用 eth_call 预执行，提前发现 revert
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulationService;

impl SimulationService {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, ctx: &TxContext, provider: &dyn ProviderTrait) -> Result<(), AppError> {
        let mut req = TransactionRequest::new()
            .to(ctx.to)
            .value(ctx.value)
            .data(ctx.data.clone());
        if let Some(from) = ctx.overrides.from {
            req = req.from(from);
        }

        provider
            .call(&req.into())
            .await
            .map_err(|e| AppError::TransactionReverted(format!("Simulation failed (likely revert): {}", e)))?;
        Ok(())
    }
}
