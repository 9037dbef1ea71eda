use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};

/// tolerances and conventions used while generating a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// balance at or below this is treated as repaid
    pub balance_epsilon: Money,
    /// remainder below this is absorbed into the current installment
    pub payoff_snap_threshold: Money,
    /// shortest gap, in days, still priced as a standard month
    pub standard_month_min_days: u32,
    /// longest gap, in days, still priced as a standard month
    pub standard_month_max_days: u32,
    pub months_per_year: u32,
    /// year length for the daily part of an accrual
    pub accrual_day_basis: u32,
}

impl ScheduleConfig {
    /// monthly installments, 360-day accrual for partial months
    pub fn standard() -> Self {
        Self {
            balance_epsilon: Money::from_decimal(dec!(0.005)),
            payoff_snap_threshold: Money::from_decimal(dec!(0.05)),
            standard_month_min_days: 28,
            standard_month_max_days: 31,
            months_per_year: 12,
            accrual_day_basis: 360,
        }
    }

    /// parse from json, missing fields take their standard values
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.balance_epsilon.is_negative() {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "balance epsilon must not be negative, got {}",
                    self.balance_epsilon
                ),
            });
        }

        if self.payoff_snap_threshold.is_negative() {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "payoff snap threshold must not be negative, got {}",
                    self.payoff_snap_threshold
                ),
            });
        }

        if self.standard_month_min_days > self.standard_month_max_days {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "standard month window is empty: {}..={} days",
                    self.standard_month_min_days, self.standard_month_max_days
                ),
            });
        }

        if self.months_per_year == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "months per year must be positive".to_string(),
            });
        }

        if self.accrual_day_basis == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "accrual day basis must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// whether a gap of `days` is priced at the flat monthly rate
    pub fn is_standard_month(&self, days: u32) -> bool {
        (self.standard_month_min_days..=self.standard_month_max_days).contains(&days)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        let config = ScheduleConfig::standard();
        assert!(config.validate().is_ok());
        assert_eq!(config, ScheduleConfig::default());
    }

    #[test]
    fn test_standard_month_window() {
        let config = ScheduleConfig::standard();
        assert!(!config.is_standard_month(27));
        assert!(config.is_standard_month(28));
        assert!(config.is_standard_month(31));
        assert!(!config.is_standard_month(32));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScheduleConfig::from_json(r#"{ "accrual_day_basis": 365 }"#).unwrap();
        assert_eq!(config.accrual_day_basis, 365);
        assert_eq!(config.months_per_year, 12);
        assert_eq!(config.balance_epsilon, ScheduleConfig::standard().balance_epsilon);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ScheduleConfig::standard();
        let json = config.to_json().unwrap();
        assert_eq!(ScheduleConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = ScheduleConfig::standard();
        config.standard_month_min_days = 32;
        assert!(matches!(
            config.validate(),
            Err(ScheduleError::InvalidConfiguration { .. })
        ));

        let config = ScheduleConfig { months_per_year: 0, ..ScheduleConfig::standard() };
        assert!(config.validate().is_err());

        let config = ScheduleConfig {
            balance_epsilon: Money::from_major(-1),
            ..ScheduleConfig::standard()
        };
        assert!(config.validate().is_err());

        assert!(ScheduleConfig::from_json("{ not json").is_err());
    }
}
