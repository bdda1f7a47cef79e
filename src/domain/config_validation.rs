//! Configuration validation.
//!
//! Validates every `[optimize]` and `[data]` field before a run starts.

use crate::domain::error::FrontierError;
use crate::domain::frontier::MAX_SAMPLES;
use crate::domain::universe::{parse_date, parse_tickers};
use crate::ports::config_port::ConfigPort;

pub fn validate_optimize_config(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_samples(config)?;
    validate_seed(config)?;
    validate_parallel(config)?;
    validate_data_dir(config)?;
    Ok(())
}

/// Boolean flag spelling shared by the config adapter and validation.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FrontierError {
    FrontierError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, FrontierError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(FrontierError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let tickers = required(config, "optimize", "tickers")?;
    parse_tickers(&tickers).map_err(|e| invalid("optimize", "tickers", e.to_string()))?;
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let start_str = required(config, "optimize", "start_date")?;
    let end_str = required(config, "optimize", "end_date")?;

    let start_date =
        parse_date(&start_str).map_err(|e| invalid("optimize", "start_date", e.to_string()))?;
    let end_date =
        parse_date(&end_str).map_err(|e| invalid("optimize", "end_date", e.to_string()))?;

    if start_date >= end_date {
        return Err(invalid(
            "optimize",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn validate_samples(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    let Some(raw) = config.get_string("optimize", "samples") else {
        return Ok(());
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > MAX_SAMPLES => Err(invalid(
            "optimize",
            "samples",
            format!("samples must be at most {MAX_SAMPLES}"),
        )),
        Ok(n) if n > 0 => Ok(()),
        _ => Err(invalid(
            "optimize",
            "samples",
            "samples must be a positive integer",
        )),
    }
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    match config.get_string("optimize", "seed") {
        Some(raw) if raw.trim().parse::<u64>().is_err() => Err(invalid(
            "optimize",
            "seed",
            "seed must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_parallel(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    match config.get_string("optimize", "parallel") {
        Some(raw) if parse_flag(&raw).is_none() => Err(invalid(
            "optimize",
            "parallel",
            "parallel must be one of true/yes/1/false/no/0",
        )),
        _ => Ok(()),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), FrontierError> {
    required(config, "data", "dir")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[optimize]
tickers = AAPL,MSFT,GOOG
start_date = 2020-01-01
end_date = 2024-12-31
samples = 10000
seed = 42

[data]
dir = ./data
"#;

    #[test]
    fn valid_config_passes() {
        assert!(validate_optimize_config(&make_config(VALID)).is_ok());
    }

    #[test]
    fn samples_and_seed_are_optional() {
        let config = make_config(
            "[optimize]\ntickers = A,B\nstart_date = 2020-01-01\nend_date = 2021-01-01\n[data]\ndir = d\n",
        );
        assert!(validate_optimize_config(&config).is_ok());
    }

    #[test]
    fn missing_tickers() {
        let config = make_config("[optimize]\nstart_date = 2020-01-01\nend_date = 2021-01-01\n");
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigMissing { key, .. } if key == "tickers"));
    }

    #[test]
    fn single_ticker_is_invalid() {
        let config = make_config(&VALID.replace("AAPL,MSFT,GOOG", "AAPL"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "tickers"));
    }

    #[test]
    fn bad_date_format() {
        let config = make_config(&VALID.replace("2020-01-01", "01/01/2020"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn start_after_end() {
        let config = make_config(&VALID.replace("2020-01-01", "2025-06-01"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_end_date() {
        let config = make_config(&VALID.replace("end_date = 2024-12-31", ""));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn zero_samples_fails() {
        let config = make_config(&VALID.replace("samples = 10000", "samples = 0"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "samples"));
    }

    #[test]
    fn negative_seed_fails() {
        let config = make_config(&VALID.replace("seed = 42", "seed = -1"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "seed"));
    }

    #[test]
    fn missing_data_dir() {
        let config = make_config(&VALID.replace("dir = ./data", ""));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigMissing { section, .. } if section == "data"));
    }

    #[test]
    fn samples_above_limit_fails() {
        let too_many = format!("samples = {}", MAX_SAMPLES + 1);
        let config = make_config(&VALID.replace("samples = 10000", &too_many));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "samples"));
    }

    #[test]
    fn parallel_flag_spellings() {
        for ok in ["true", "YES", "1", "false", "no", "0"] {
            let config =
                make_config(&VALID.replace("seed = 42", &format!("seed = 42\nparallel = {ok}")));
            assert!(validate_optimize_config(&config).is_ok(), "{ok}");
        }
    }

    #[test]
    fn misspelled_parallel_flag_fails() {
        let config = make_config(&VALID.replace("seed = 42", "seed = 42\nparallel = ture"));
        let err = validate_optimize_config(&config).unwrap_err();
        assert!(matches!(err, FrontierError::ConfigInvalid { key, .. } if key == "parallel"));
    }
}
