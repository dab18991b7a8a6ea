use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};
use crate::interest::{InterestEngine, PenaltyConfig, TermRateTable};

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub pricing: PricingConfig,
    pub penalty: PenaltyConfig,
}

/// interest pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// price list used when a loan is priced by term
    pub term_rates: TermRateTable,
    /// highest rate accepted for a single term, if any
    pub rate_ceiling: Option<Rate>,
}

impl LedgerConfig {
    /// 7/14/30 day price list, 200% rate ceiling, 5% daily penalty
    pub fn standard() -> Self {
        Self {
            pricing: PricingConfig {
                term_rates: TermRateTable::standard(),
                rate_ceiling: Some(Rate::from_percentage(200)),
            },
            penalty: PenaltyConfig::default(),
        }
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.penalty.daily_rate.is_positive() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("penalty rate must be positive, got {}", self.penalty.daily_rate),
            });
        }

        if let Some(ceiling) = self.pricing.rate_ceiling {
            if !ceiling.is_positive() {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("rate ceiling must be positive, got {}", ceiling),
                });
            }
        }

        for (term, rate) in self.pricing.term_rates.iter() {
            if term == 0 {
                return Err(LedgerError::InvalidConfiguration {
                    message: "price list contains a zero-day term".to_string(),
                });
            }
            if !rate.is_positive() {
                return Err(LedgerError::InvalidConfiguration {
                    message: format!("rate for {} day term must be positive, got {}", term, rate),
                });
            }
            if let Some(ceiling) = self.pricing.rate_ceiling {
                if rate > ceiling {
                    return Err(LedgerError::InvalidConfiguration {
                        message: format!(
                            "rate for {} day term ({}) exceeds ceiling {}",
                            term, rate, ceiling
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// interest engine for this configuration
    pub fn interest_engine(&self) -> InterestEngine {
        InterestEngine::new(self.pricing.term_rates.clone(), self.pricing.rate_ceiling)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::standard()
    }
}
