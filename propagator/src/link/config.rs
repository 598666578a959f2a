//! Network registry loaded from YAML.

use crate::link::{Error, Mode};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs::File, path::Path};

/// Program invoked to establish each link
pub const DEFAULT_TOOL: &str = "hardhat";

/// Subcommand of [DEFAULT_TOOL] that sets a trusted remote
pub const DEFAULT_SUBCOMMAND: &str = "setTrustedRemote";

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}

fn default_subcommand() -> String {
    DEFAULT_SUBCOMMAND.to_string()
}

/// Ordered list of network identifiers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct NetworkSet(Vec<String>);

impl NetworkSet {
    /// Creates a [NetworkSet] from identifiers in registry order.
    pub fn new(networks: Vec<String>) -> Self {
        Self(networks)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the network at `index`, the designated source of a propagation run.
    pub fn source(&self, index: usize) -> Result<&str, Error> {
        self.0
            .get(index)
            .map(String::as_str)
            .ok_or(Error::SourceOutOfRange {
                index,
                len: self.0.len(),
            })
    }

    fn validate(&self, mode: Mode) -> Result<(), Error> {
        if self.0.is_empty() {
            return Err(Error::EmptyNetworkSet(mode));
        }
        let mut seen = HashSet::new();
        for network in &self.0 {
            if !seen.insert(network) {
                return Err(Error::DuplicateNetwork(network.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Networks {
    pub test: NetworkSet,
    pub production: NetworkSet,
}

/// Network registry and link tool settings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_subcommand")]
    pub subcommand: String,

    /// Position of the source network within the active [NetworkSet].
    ///
    /// Operators pick a hub network by index instead of reordering the registry.
    pub source_index: usize,
    pub networks: Networks,
}

impl Config {
    /// Loads and validates a [Config] from a YAML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let config: Config = {
            let config_file = File::open(path)?;
            serde_yaml::from_reader(config_file)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Ensures every [NetworkSet] is non-empty and free of duplicates.
    ///
    /// The source index is not checked here: it is resolved against the active set at
    /// propagation time.
    pub fn validate(&self) -> Result<(), Error> {
        self.networks.test.validate(Mode::Test)?;
        self.networks.production.validate(Mode::Production)
    }

    /// Returns the [NetworkSet] selected by `mode`.
    pub fn networks(&self, mode: Mode) -> &NetworkSet {
        match mode {
            Mode::Test => &self.networks.test,
            Mode::Production => &self.networks.production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
source_index: 3
networks:
  test: [fuji, mumbai, bsc-testnet, goerli]
  production: [avalanche, polygon, bsc, ethereum, arbitrum]
"#;

    fn set(networks: &[&str]) -> NetworkSet {
        NetworkSet::new(networks.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_parse_defaults() {
        let config: Config = serde_yaml::from_str(REGISTRY).unwrap();
        config.validate().unwrap();
        assert_eq!(config.tool, DEFAULT_TOOL);
        assert_eq!(config.subcommand, DEFAULT_SUBCOMMAND);
        assert_eq!(config.source_index, 3);
        assert_eq!(
            config.networks(Mode::Test),
            &set(&["fuji", "mumbai", "bsc-testnet", "goerli"])
        );
        assert_eq!(config.networks(Mode::Production).len(), 5);
    }

    #[test]
    fn test_parse_tool_override() {
        let yaml = r#"
tool: npx
subcommand: lz:setTrustedRemote
source_index: 0
networks:
  test: [a]
  production: [b]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tool, "npx");
        assert_eq!(config.subcommand, "lz:setTrustedRemote");
    }

    #[test]
    fn test_missing_source_index() {
        let yaml = r#"
networks:
  test: [a]
  production: [b]
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_empty_set() {
        let yaml = r#"
source_index: 0
networks:
  test: [a]
  production: []
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::EmptyNetworkSet(Mode::Production))
        ));
    }

    #[test]
    fn test_duplicate_network() {
        let yaml = r#"
source_index: 0
networks:
  test: [a, b, a]
  production: [c]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        match config.validate() {
            Err(Error::DuplicateNetwork(name)) => assert_eq!(name, "a"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_source() {
        let networks = set(&["a", "b", "c", "d"]);
        assert_eq!(networks.source(0).unwrap(), "a");
        assert_eq!(networks.source(3).unwrap(), "d");
        assert!(matches!(
            networks.source(4),
            Err(Error::SourceOutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn test_load() {
        let dir = std::env::temp_dir().join(format!("propagator_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("networks.yaml");
        std::fs::write(&path, REGISTRY).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.networks(Mode::Test).source(3).unwrap(), "goerli");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("propagator_missing_registry.yaml");
        assert!(matches!(Config::load(&path), Err(Error::Io(_))));
    }
}
