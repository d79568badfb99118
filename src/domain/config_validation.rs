//! Configuration validation.
//!
//! Rejects bad inputs before any data is loaded.

use super::config::CrossoverConfig;
use super::error::CrossoverError;

pub fn validate_config(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    validate_ticker(config)?;
    validate_dates(config)?;
    validate_windows(config)?;
    validate_capital(config)?;
    validate_shares_per_trade(config)?;
    Ok(())
}

fn validate_ticker(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    if config.ticker.trim().is_empty() {
        return Err(CrossoverError::invalid("ticker", "ticker must not be empty"));
    }
    Ok(())
}

fn validate_dates(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    if config.end_date < config.start_date {
        return Err(CrossoverError::invalid(
            "end_date",
            format!(
                "end_date {} is earlier than start_date {}",
                config.end_date, config.start_date
            ),
        ));
    }
    Ok(())
}

fn validate_windows(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    if config.short_window == 0 {
        return Err(CrossoverError::invalid(
            "short_window",
            "short_window must be positive",
        ));
    }
    if config.long_window == 0 {
        return Err(CrossoverError::invalid(
            "long_window",
            "long_window must be positive",
        ));
    }
    if config.long_window <= config.short_window {
        return Err(CrossoverError::invalid(
            "long_window",
            format!(
                "long_window ({}) must be greater than short_window ({})",
                config.long_window, config.short_window
            ),
        ));
    }
    Ok(())
}

fn validate_capital(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    if !config.capital.is_finite() || config.capital <= 0.0 {
        return Err(CrossoverError::invalid("capital", "capital must be positive"));
    }
    Ok(())
}

fn validate_shares_per_trade(config: &CrossoverConfig) -> Result<(), CrossoverError> {
    if config.shares_per_trade == 0 {
        return Err(CrossoverError::invalid(
            "stocks_per_trade",
            "stocks_per_trade must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid() -> CrossoverConfig {
        CrossoverConfig::new(
            "INFY.NS",
            NaiveDate::from_ymd_opt(2007, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2017, 12, 31).unwrap(),
        )
    }

    fn field_of(err: CrossoverError) -> String {
        match err {
            CrossoverError::InvalidRange { field, .. } => field,
            other => panic!("expected InvalidRange, got {other:?}"),
        }
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn accepts_single_day_range() {
        let mut c = valid();
        c.end_date = c.start_date;
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn rejects_empty_ticker() {
        let c = CrossoverConfig {
            ticker: "  ".into(),
            ..valid()
        };
        assert_eq!(field_of(validate_config(&c).unwrap_err()), "ticker");
    }

    #[test]
    fn rejects_reversed_dates() {
        let c = CrossoverConfig {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            ..valid()
        };
        assert_eq!(field_of(validate_config(&c).unwrap_err()), "end_date");
    }

    #[test]
    fn rejects_zero_windows() {
        let c = CrossoverConfig {
            short_window: 0,
            ..valid()
        };
        assert_eq!(field_of(validate_config(&c).unwrap_err()), "short_window");

        let c = CrossoverConfig {
            long_window: 0,
            ..valid()
        };
        assert_eq!(field_of(validate_config(&c).unwrap_err()), "long_window");
    }

    #[test]
    fn rejects_long_not_above_short() {
        let c = CrossoverConfig {
            short_window: 200,
            long_window: 200,
            ..valid()
        };
        let err = validate_config(&c).unwrap_err();
        assert!(err.to_string().contains("must be greater than short_window"));
    }

    #[test]
    fn rejects_non_positive_capital() {
        for capital in [0.0, -5.0, f64::NAN] {
            let c = CrossoverConfig {
                capital,
                ..valid()
            };
            assert_eq!(field_of(validate_config(&c).unwrap_err()), "capital");
        }
    }

    #[test]
    fn rejects_zero_lot() {
        let c = CrossoverConfig {
            shares_per_trade: 0,
            ..valid()
        };
        assert_eq!(
            field_of(validate_config(&c).unwrap_err()),
            "stocks_per_trade"
        );
    }
}
