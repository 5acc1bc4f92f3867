use crate::error::RiskError;
use configuration::CostModelConfig;
use rust_decimal::Decimal;

/// Maps an instrument symbol and a traded size to a brokerage cost.
#[derive(Debug, Clone)]
pub struct CostModel {
    /// Upper-cased prefixes, longest first so the most specific family wins.
    fees: Vec<(String, Decimal)>,
}

impl CostModel {
    pub fn new(config: &CostModelConfig) -> Result<Self, RiskError> {
        let mut fees = Vec::with_capacity(config.instruments.len());
        for instrument in &config.instruments {
            let prefix = instrument.prefix.trim().to_uppercase();
            if prefix.is_empty() {
                return Err(RiskError::InvalidParameters(
                    "instrument prefix must not be empty".to_string(),
                ));
            }
            if instrument.fee_per_contract < Decimal::ZERO {
                return Err(RiskError::InvalidParameters(format!(
                    "fee_per_contract for '{}' must not be negative",
                    prefix
                )));
            }
            fees.push((prefix, instrument.fee_per_contract));
        }
        fees.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self { fees })
    }

    /// The per-contract fee of the family `asset` belongs to, if any.
    pub fn fee_for(&self, asset: &str) -> Option<Decimal> {
        let symbol = asset.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }
        self.fees
            .iter()
            .find(|(prefix, _)| symbol.starts_with(prefix.as_str()))
            .map(|(_, fee)| *fee)
    }

    /// Cost of trading `quantity` contracts of `asset`.
    ///
    /// `quantity` is the larger of the buy and sell legs of the operation.
    /// Unknown or empty symbols cost nothing. `None` means the cost does not fit
    /// in a `Decimal`.
    pub fn cost(&self, asset: &str, quantity: Decimal) -> Option<Decimal> {
        match self.fee_for(asset) {
            Some(fee) => quantity.checked_mul(fee),
            None => Some(Decimal::ZERO),
        }
    }
}
