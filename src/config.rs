use thiserror::Error;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur while reading the command line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Usage: hashchain-ledger <int amount>")]
    Usage,

    #[error("Invalid initial amount: {0}")]
    InvalidAmount(String),
}

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Amount Alice holds in the genesis block
    pub initial_amount: i32,
}

impl Config {
    /// Builds the configuration from the program arguments
    ///
    /// # Arguments
    ///
    /// * `args` - The arguments after the program name
    ///
    /// # Returns
    ///
    /// The configuration, or `Usage` unless exactly one integer argument is given
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        let amount = match (args.next(), args.next()) {
            (Some(amount), None) => amount,
            _ => return Err(ConfigError::Usage),
        };

        let initial_amount = amount
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAmount(amount.clone()))?;

        Ok(Config { initial_amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_amount() {
        let config = Config::from_args(args(&["300"])).unwrap();
        assert_eq!(config.initial_amount, 300);

        // Sign is checked when the chain is created
        let config = Config::from_args(args(&["-5"])).unwrap();
        assert_eq!(config.initial_amount, -5);
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(Config::from_args(args(&[])), Err(ConfigError::Usage));
        assert_eq!(Config::from_args(args(&["1", "2"])), Err(ConfigError::Usage));
    }

    #[test]
    fn test_unparsable_amount() {
        assert_eq!(
            Config::from_args(args(&["lots"])),
            Err(ConfigError::InvalidAmount("lots".to_string()))
        );
        assert!(Config::from_args(args(&["99999999999"])).is_err());
    }
}
