use core_types::{Client, PlanCategory};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section falls back to the documented house policy, so an absent
/// `config.toml` still produces a working analyst.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cost_model: CostModelConfig,
    pub risk_policy: RiskPolicy,
    pub plans: PlanTable,
    pub ingestion: IngestionConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Seed records for the in-memory client directory.
    pub clients: Vec<Client>,
}

impl Config {
    /// Checks the settings that no downstream constructor validates on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingestion.sentinel.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ingestion.sentinel must not be empty".to_string(),
            ));
        }
        if self.ingestion.max_rows == 0 {
            return Err(ConfigError::ValidationError(
                "ingestion.max_rows must be greater than 0".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-contract brokerage costs, keyed by instrument family.
#[derive(Debug, Clone, Deserialize)]
pub struct CostModelConfig {
    pub instruments: Vec<InstrumentFee>,
}

/// The fee charged per contract for every symbol starting with `prefix`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentFee {
    /// Matched case-insensitively against the start of the asset symbol (e.g. "WIN").
    pub prefix: String,
    pub fee_per_contract: Decimal,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            instruments: vec![
                // Mini Ibovespa index futures.
                InstrumentFee {
                    prefix: "WIN".to_string(),
                    fee_per_contract: dec!(0.25),
                },
                // Mini dollar futures.
                InstrumentFee {
                    prefix: "WDO".to_string(),
                    fee_per_contract: dec!(1.20),
                },
            ],
        }
    }
}

/// The funded-account risk and qualification policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// A day whose net result exceeds this share of the goal needs attention.
    pub warning_threshold_pct: Decimal,
    /// A day whose net result exceeds this share of the goal eliminates the trader.
    pub violation_threshold_pct: Decimal,
    /// Distinct trading days required to qualify.
    pub minimum_days: usize,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            warning_threshold_pct: dec!(30),
            violation_threshold_pct: dec!(35),
            minimum_days: 10,
        }
    }
}

/// Goal amounts per funded-account plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanTable {
    /// Goal used for plans missing from `tiers`.
    pub default_goal: Decimal,
    pub tiers: Vec<PlanTier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanTier {
    pub id: String,
    pub goal: Decimal,
    #[serde(default)]
    pub category: PlanCategory,
}

impl PlanTier {
    fn new(id: &str, goal: Decimal, category: PlanCategory) -> Self {
        Self {
            id: id.to_string(),
            goal,
            category,
        }
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self {
            default_goal: dec!(1000),
            tiers: vec![
                PlanTier::new("25K", dec!(1500), PlanCategory::Standard),
                PlanTier::new("50K", dec!(3000), PlanCategory::Standard),
                PlanTier::new("100K", dec!(6000), PlanCategory::Standard),
                PlanTier::new("DIRETO 50K", dec!(3000), PlanCategory::Direct),
                PlanTier::new("MGT 100K", dec!(6000), PlanCategory::Managed),
            ],
        }
    }
}

/// Layout of the brokerage operations export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// First cell of the header row that precedes the data rows.
    pub sentinel: String,
    pub delimiter: Delimiter,
    /// Exports with more data rows than this are rejected outright.
    pub max_rows: usize,
    pub columns: ColumnLayout,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            sentinel: "Subconta".to_string(),
            delimiter: Delimiter::Auto,
            max_rows: 20_000,
            columns: ColumnLayout::default(),
        }
    }
}

/// Field separator of the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Delimiter {
    /// Detected from the header row.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = ";")]
    Semicolon,
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = "\t")]
    Tab,
}

impl Delimiter {
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Delimiter::Auto => None,
            Delimiter::Semicolon => Some(b';'),
            Delimiter::Comma => Some(b','),
            Delimiter::Tab => Some(b'\t'),
        }
    }
}

/// Zero-based column offsets of the fields we read from each data row.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub asset: usize,
    pub open_date: usize,
    pub buy_quantity: usize,
    pub sell_quantity: usize,
    pub result: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        // Subconta | Ativo | Abertura | Fechamento | Tempo Operação | Qtd Compra | Qtd Venda |
        // Lado | Preço Compra | Preço Venda | Preço de Mercado | Res. Intervalo |
        // Res. Intervalo (%) | Número Operação | Res. Operação | ...
        Self {
            asset: 1,
            open_date: 2,
            buy_quantity: 5,
            sell_quantity: 6,
            result: 14,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for an uploaded export, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs also go to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
