//! Resolver limits and thresholds.
//!
//! Defaults suit the autocomplete funnel and map viewport of the comparison
//! site. A TOML file can override any subset of fields, and
//! `COVERAGE_MAP_<FIELD>` environment variables override the file.
//!
//! ```toml
//! locality_limit = 12
//! area_limit_deg = 0.05
//! coverage_row_limit = 1000
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Errors that can occur while loading a [`ResolverConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ResolverConfig`].
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
    },

    /// A value is out of its allowed range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Limits and thresholds for the resolvers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Shortest locality query that reaches the store.
    pub locality_min_chars: usize,
    /// Default number of locality candidates.
    pub locality_limit: usize,
    /// Largest cap a caller may request for localities.
    pub locality_max_limit: usize,
    /// Rows fetched from the store before ranking and deduplication.
    pub locality_scan_limit: u32,
    /// Shortest street query that reaches the store.
    pub street_min_chars: usize,
    /// Number of street candidates returned.
    pub street_limit: usize,
    /// Raw street rows fetched before grouping.
    pub street_scan_limit: u32,
    /// Default number of building numbers.
    pub number_limit: usize,
    /// Largest cap a caller may request for building numbers.
    pub number_max_limit: usize,
    /// Rows fetched before natural sorting.
    pub number_scan_limit: u32,
    /// Largest latitude or longitude span, in degrees, that a coverage box
    /// may have. Roughly a 5×5 km tile at Polish latitudes.
    pub area_limit_deg: f64,
    /// Most coverage points returned for one box.
    pub coverage_row_limit: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            locality_min_chars: 2,
            locality_limit: 10,
            locality_max_limit: 50,
            locality_scan_limit: 100,
            street_min_chars: 2,
            street_limit: 25,
            street_scan_limit: 500,
            number_limit: 50,
            number_max_limit: 200,
            number_scan_limit: 1000,
            area_limit_deg: 0.05,
            coverage_row_limit: 1000,
        }
    }
}

/// Reads `COVERAGE_MAP_<NAME>` into `target` when set.
fn env_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    let var = format!("COVERAGE_MAP_{}", name.to_uppercase());
    if let Some(value) = lookup(&var) {
        *target = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: var.clone(),
            value: value.clone(),
        })?;
        log::debug!("{var} overrides {name}");
    }
    Ok(())
}

impl ResolverConfig {
    /// Parses a TOML document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is invalid or a value is out
    /// of range.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from an optional TOML file, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, an
    /// override is malformed, or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading resolver config from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `COVERAGE_MAP_*` overrides using `lookup` to read variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be parsed or the result is
    /// out of range.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        env_override(&lookup, "locality_min_chars", &mut self.locality_min_chars)?;
        env_override(&lookup, "locality_limit", &mut self.locality_limit)?;
        env_override(&lookup, "locality_max_limit", &mut self.locality_max_limit)?;
        env_override(&lookup, "locality_scan_limit", &mut self.locality_scan_limit)?;
        env_override(&lookup, "street_min_chars", &mut self.street_min_chars)?;
        env_override(&lookup, "street_limit", &mut self.street_limit)?;
        env_override(&lookup, "street_scan_limit", &mut self.street_scan_limit)?;
        env_override(&lookup, "number_limit", &mut self.number_limit)?;
        env_override(&lookup, "number_max_limit", &mut self.number_max_limit)?;
        env_override(&lookup, "number_scan_limit", &mut self.number_scan_limit)?;
        env_override(&lookup, "area_limit_deg", &mut self.area_limit_deg)?;
        env_override(&lookup, "coverage_row_limit", &mut self.coverage_row_limit)?;
        self.validate()
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::Invalid {
                message: message.to_string(),
            })
        };

        if !self.area_limit_deg.is_finite() || self.area_limit_deg <= 0.0 {
            return invalid("area_limit_deg must be a positive number");
        }
        if self.locality_limit == 0 || self.locality_limit > self.locality_max_limit {
            return invalid("locality_limit must be between 1 and locality_max_limit");
        }
        if self.number_limit == 0 || self.number_limit > self.number_max_limit {
            return invalid("number_limit must be between 1 and number_max_limit");
        }
        if self.street_limit == 0 {
            return invalid("street_limit must be at least 1");
        }
        if self.locality_scan_limit == 0
            || self.street_scan_limit == 0
            || self.number_scan_limit == 0
            || self.coverage_row_limit == 0
        {
            return invalid("scan and row limits must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ResolverConfig::default();
        config.validate().unwrap();
        assert!((config.area_limit_deg - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.coverage_row_limit, 1000);
        assert_eq!(config.street_limit, 25);
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let config = ResolverConfig::from_toml_str("locality_limit = 12\nstreet_limit = 30\n").unwrap();
        assert_eq!(config.locality_limit, 12);
        assert_eq!(config.street_limit, 30);
        assert_eq!(config.number_limit, 50);
    }

    #[test]
    fn unknown_toml_fields_are_rejected() {
        let err = ResolverConfig::from_toml_str("area_limit = 0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = ResolverConfig::from_toml_str("area_limit_deg = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = ResolverConfig::from_toml_str("number_limit = 500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn environment_overrides_apply() {
        let vars = BTreeMap::from([
            ("COVERAGE_MAP_AREA_LIMIT_DEG", "0.02"),
            ("COVERAGE_MAP_COVERAGE_ROW_LIMIT", " 250 "),
        ]);
        let mut config = ResolverConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(ToString::to_string))
            .unwrap();
        assert!((config.area_limit_deg - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.coverage_row_limit, 250);
    }

    #[test]
    fn malformed_environment_override_is_an_error() {
        let mut config = ResolverConfig::default();
        let err = config
            .apply_overrides(|name| {
                (name == "COVERAGE_MAP_STREET_LIMIT").then(|| "many".to_string())
            })
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnv { ref name, .. } if name == "COVERAGE_MAP_STREET_LIMIT")
        );
    }
}
