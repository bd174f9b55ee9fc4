//! Configuration validation.
//!
//! Every key is optional, but a key that is present must hold a usable value.

use crate::domain::error::MarketsimError;
use crate::ports::config_port::ConfigPort;

pub const SECURITY_SECTION_PREFIX: &str = "security:";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), MarketsimError> {
    validate_generator(config)?;
    validate_indicators(config)?;
    validate_forecast(config)?;
    validate_securities(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> MarketsimError {
    MarketsimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, MarketsimError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(section, key, "expected a number")),
    }
}

fn validate_generator(config: &dyn ConfigPort) -> Result<(), MarketsimError> {
    if let Some(volatility) = validate_number(config, "generator", "volatility")? {
        if volatility < 0.0 {
            return Err(invalid("generator", "volatility", "volatility must be non-negative"));
        }
    }

    if let Some(seed) = config.get_string("generator", "seed") {
        if seed.trim().parse::<u64>().is_err() {
            return Err(invalid("generator", "seed", "seed must be a non-negative integer"));
        }
    }

    for key in ["start_date", "end_date"] {
        if config.get_string("generator", key).is_some() && config.get_date("generator", key).is_none() {
            return Err(invalid(
                "generator",
                key,
                "invalid date format (expected YYYY-MM-DD)",
            ));
        }
    }

    if let (Some(start), Some(end)) = (
        config.get_date("generator", "start_date"),
        config.get_date("generator", "end_date"),
    ) {
        if end < start {
            return Err(invalid("generator", "end_date", "end_date must not precede start_date"));
        }
    }
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), MarketsimError> {
    for key in ["sma_period", "ema_period", "rsi_period"] {
        if let Some(raw) = config.get_string("indicators", key) {
            match raw.trim().parse::<usize>() {
                Ok(period) if period > 0 => {}
                _ => return Err(invalid("indicators", key, "period must be a positive integer")),
            }
        }
    }

    if let Some(seed) = config.get_string("indicators", "ema_seed") {
        let seed = seed.trim().to_lowercase();
        if seed != "first" && seed != "base" {
            return Err(invalid("indicators", "ema_seed", "ema_seed must be 'first' or 'base'"));
        }
    }
    Ok(())
}

fn validate_forecast(config: &dyn ConfigPort) -> Result<(), MarketsimError> {
    if let Some(raw) = config.get_string("forecast", "latency_ms") {
        if raw.trim().parse::<u64>().is_err() {
            return Err(invalid(
                "forecast",
                "latency_ms",
                "latency_ms must be a non-negative integer",
            ));
        }
    }

    if let Some(p) = validate_number(config, "forecast", "up_probability")? {
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(
                "forecast",
                "up_probability",
                "up_probability must be between 0 and 1",
            ));
        }
    }
    Ok(())
}

fn validate_securities(config: &dyn ConfigPort) -> Result<(), MarketsimError> {
    for section in config
        .sections()
        .into_iter()
        .filter(|s| s.starts_with(SECURITY_SECTION_PREFIX))
    {
        if section[SECURITY_SECTION_PREFIX.len()..].trim().is_empty() {
            return Err(invalid(&section, "", "security section needs a symbol"));
        }
        for key in ["base_price", "quote_price"] {
            if let Some(price) = validate_number(config, &section, key)? {
                if price <= 0.0 {
                    return Err(invalid(&section, key, "price must be positive"));
                }
            }
        }
        if let Some(drift) = validate_number(config, &section, "drift_rate")? {
            if drift <= -1.0 {
                return Err(invalid(&section, "drift_rate", "drift_rate must be greater than -1"));
            }
        }
    }
    Ok(())
}
