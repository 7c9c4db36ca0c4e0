use crate::zone::name::{absolute_name, fqdn};
use crate::zone::{ZoneParser, constants};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound accepted for `max_zone_size` (1 GiB)
const MAX_ZONE_SIZE_LIMIT: usize = 1024 * 1024 * 1024;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid view: {0}")]
    InvalidView(String),
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
    #[error("Invalid zone size: {0}")]
    InvalidZoneSize(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Cannot read config file {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Which projection of the zone to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum ViewKind {
    /// One element per resource record
    #[default]
    #[serde(rename = "records")]
    #[value(name = "records")]
    Records,
    /// One element per RRSet; fails on inconsistent TTLs
    #[serde(rename = "rrsets")]
    #[value(name = "rrsets")]
    RecordSets,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Records => f.write_str("records"),
            ViewKind::RecordSets => f.write_str("rrsets"),
        }
    }
}

impl FromStr for ViewKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "records" => Ok(ViewKind::Records),
            "rrsets" | "record_sets" => Ok(ViewKind::RecordSets),
            _ => Err(ConfigError::InvalidView(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Origin for relative names; also enables the `name` field of results
    pub origin: Option<String>,

    /// Projection to produce
    pub view: ViewKind,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Largest zone content accepted, in bytes
    pub max_zone_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            origin: None,
            view: ViewKind::Records,
            pretty: false,
            max_zone_size: constants::MAX_ZONE_FILE_SIZE,
        }
    }
}

/// Settings given on the command line; unset fields leave lower layers alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub origin: Option<String>,
    pub view: Option<ViewKind>,
    pub pretty: bool,
}

impl ReaderConfig {
    /// Layered configuration: the file at `path` (or defaults), then
    /// `ZONEFILE_*` variables read through `lookup`, then `overrides`
    pub fn load<F>(
        path: Option<&Path>,
        lookup: F,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let mut config = base.with_env_overrides(lookup)?;

        if let Some(origin) = &overrides.origin {
            config.origin = Some(origin.clone());
        }
        if let Some(view) = overrides.view {
            config.view = view;
        }
        if overrides.pretty {
            config.pretty = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ZONEFILE_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup("ZONEFILE_ORIGIN") {
            self.origin = Some(origin).filter(|o| !o.is_empty());
        }

        if let Some(view) = lookup("ZONEFILE_VIEW") {
            self.view = view.parse()?;
        }

        if let Some(pretty) = lookup("ZONEFILE_PRETTY") {
            self.pretty = parse_bool(&pretty, self.pretty);
        }

        if let Some(max_size) = lookup("ZONEFILE_MAX_ZONE_SIZE") {
            self.max_zone_size = max_size
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidZoneSize(max_size.clone()))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_zone_size == 0 {
            return Err(ConfigError::InvalidZoneSize(
                "Zone size limit must be greater than 0".to_string(),
            ));
        }
        if self.max_zone_size > MAX_ZONE_SIZE_LIMIT {
            return Err(ConfigError::InvalidZoneSize(
                "Zone size limit too large (max 1 GiB)".to_string(),
            ));
        }

        if let Some(origin) = self.origin.as_deref().filter(|o| !o.is_empty()) {
            absolute_name(&fqdn(origin), None)
                .map_err(|e| ConfigError::InvalidOrigin(format!("{}: {}", origin, e)))?;
        }

        Ok(())
    }

    /// The origin, if one is configured
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref().filter(|o| !o.is_empty())
    }

    /// A zone parser honoring this configuration's limits
    pub fn parser(&self) -> ZoneParser {
        ZoneParser::new().with_max_zone_size(self.max_zone_size)
    }
}

/// Parse a boolean from a string, with a default value for invalid input
fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ReaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.origin(), None);
        assert_eq!(config.view, ViewKind::Records);
    }

    #[test]
    fn test_invalid_zone_size() {
        let config = ReaderConfig {
            max_zone_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReaderConfig {
            max_zone_size: MAX_ZONE_SIZE_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_origin() {
        let config = ReaderConfig {
            origin: Some("bad..origin".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = ReaderConfig::default()
            .with_env_overrides(lookup(&[
                ("ZONEFILE_ORIGIN", "main.test"),
                ("ZONEFILE_VIEW", "rrsets"),
                ("ZONEFILE_PRETTY", "yes"),
                ("ZONEFILE_MAX_ZONE_SIZE", "4096"),
            ]))
            .unwrap();

        assert_eq!(config.origin(), Some("main.test"));
        assert_eq!(config.view, ViewKind::RecordSets);
        assert!(config.pretty);
        assert_eq!(config.max_zone_size, 4096);
    }

    #[test]
    fn test_env_override_errors() {
        let result =
            ReaderConfig::default().with_env_overrides(lookup(&[("ZONEFILE_VIEW", "flat")]));
        assert_eq!(result, Err(ConfigError::InvalidView("flat".to_string())));

        let result = ReaderConfig::default()
            .with_env_overrides(lookup(&[("ZONEFILE_MAX_ZONE_SIZE", "lots")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidZoneSize("lots".to_string()))
        );
    }

    #[test]
    fn test_empty_origin_env_clears_origin() {
        let config = ReaderConfig {
            origin: Some("main.test".to_string()),
            ..Default::default()
        }
        .with_env_overrides(lookup(&[("ZONEFILE_ORIGIN", "")]))
        .unwrap();
        assert_eq!(config.origin(), None);
    }

    #[test]
    fn test_from_toml_str() {
        let config = ReaderConfig::from_toml_str(
            r#"
origin = "main.test."
view = "rrsets"
pretty = true
"#,
        )
        .unwrap();
        assert_eq!(config.origin(), Some("main.test."));
        assert_eq!(config.view, ViewKind::RecordSets);
        assert!(config.pretty);
        assert_eq!(config.max_zone_size, constants::MAX_ZONE_FILE_SIZE);

        assert!(matches!(
            ReaderConfig::from_toml_str("colour = \"blue\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_without_file() {
        let overrides = ConfigOverrides {
            view: Some(ViewKind::RecordSets),
            ..Default::default()
        };
        let config = ReaderConfig::load(
            None,
            lookup(&[("ZONEFILE_ORIGIN", "env.test"), ("ZONEFILE_VIEW", "records")]),
            &overrides,
        )
        .unwrap();
        assert_eq!(config.origin(), Some("env.test"));
        assert_eq!(config.view, ViewKind::RecordSets);
        assert!(!config.pretty);

        let overrides = ConfigOverrides {
            origin: Some("bad..origin".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ReaderConfig::load(None, lookup(&[]), &overrides),
            Err(ConfigError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true", false));
        assert!(parse_bool("TRUE", false));
        assert!(parse_bool("1", false));
        assert!(parse_bool("yes", false));
        assert!(parse_bool("on", false));

        assert!(!parse_bool("false", true));
        assert!(!parse_bool("FALSE", true));
        assert!(!parse_bool("0", true));
        assert!(!parse_bool("no", true));
        assert!(!parse_bool("off", true));

        assert!(parse_bool("invalid", true));
        assert!(!parse_bool("invalid", false));
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("RRSets".parse::<ViewKind>().unwrap(), ViewKind::RecordSets);
        assert_eq!("records".parse::<ViewKind>().unwrap(), ViewKind::Records);
        assert_eq!(ViewKind::RecordSets.to_string(), "rrsets");
    }
}
