use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, FeeBasis, FeeRule, FeeSchedule, ServiceSettings};

/// Loads the engine configuration, layering an optional `config.toml` over the
/// compiled-in defaults.
///
/// The file may override any subset of the settings; a missing file yields the
/// defaults, which mirror the production deployment (launch date, excluded
/// provider, metadata markers and the full fee schedule).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional; every field has a serde default.
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate_fee_schedule(&config.fee_schedule)?;

    Ok(config)
}

/// Rejects fee rules that would produce nonsense estimates: negative rates
/// and non-positive period divisors.
fn validate_fee_schedule(schedule: &FeeSchedule) -> Result<(), ConfigError> {
    for (asset_type, rule) in schedule.iter() {
        if rule.rate.is_sign_negative() {
            return Err(ConfigError::InvalidFeeRule {
                asset_type: asset_type.to_string(),
                reason: format!("negative rate {}", rule.rate),
            });
        }
        if rule.period_divisor <= rust_decimal::Decimal::ZERO {
            return Err(ConfigError::InvalidFeeRule {
                asset_type: asset_type.to_string(),
                reason: format!("non-positive period divisor {}", rule.period_divisor),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_schedule_passes_validation() {
        assert!(validate_fee_schedule(&FeeSchedule::default()).is_ok());
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut schedule = FeeSchedule::empty();
        schedule.insert("Arbitrage", FeeRule::flat(dec!(-0.01), FeeBasis::VolumeGhs));
        assert!(matches!(
            validate_fee_schedule(&schedule),
            Err(ConfigError::InvalidFeeRule { .. })
        ));
    }
}
