//! Establish trusted-remote links from a source network to every other network in a set.

use std::fmt;
use thiserror::Error;

mod config;
pub use config::{Config, NetworkSet, Networks, DEFAULT_SUBCOMMAND, DEFAULT_TOOL};
mod invoker;
pub use invoker::{CommandSpec, InvocationResult, Invoker, Runner, ShellRunner};
mod propagate;
pub use propagate::{Propagator, Summary};

pub const PROPAGATE_CMD: &str = "propagate";
pub const PLAN_CMD: &str = "plan";

/// Default path of the network registry
pub const DEFAULT_CONFIG: &str = "networks.yaml";

/// Default execution mode
pub const DEFAULT_TASK: &str = "production";

/// Errors that can occur while propagating links.
#[derive(Error, Debug)]
pub enum Error {
    #[error("must pass in contract name OR pass in both local contract name and remote contract name")]
    InvalidRequest,
    #[error("source index {index} out of range for network set of length {len}")]
    SourceOutOfRange { index: usize, len: usize },
    #[error("failed to set trusted remote from {src} to {dst} (exit code: {exit_code:?})")]
    LinkFailed {
        src: String,
        dst: String,
        exit_code: Option<i32>,
    },
    #[error("{0} network set is empty")]
    EmptyNetworkSet(Mode),
    #[error("duplicate network: {0}")]
    DuplicateNetwork(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Selects which [NetworkSet] of the registry is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Test,
    Production,
}

impl From<&str> for Mode {
    /// `"test"` selects [Mode::Test]; any other value selects [Mode::Production].
    fn from(value: &str) -> Self {
        if value == "test" {
            Mode::Test
        } else {
            Mode::Production
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Production => write!(f, "production"),
        }
    }
}

/// Contract name(s) configured on each end of a link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractNames {
    /// The same contract name is deployed on both networks.
    Shared(String),
    /// The source and target networks use different contract names.
    Distinct { local: String, remote: String },
}

/// A request to propagate links for one release.
#[derive(Clone, Debug)]
pub struct Request {
    pub mode: Mode,
    pub contract: Option<String>,
    pub local_contract: Option<String>,
    pub remote_contract: Option<String>,
}

impl Request {
    /// Resolves the contract naming scheme.
    ///
    /// Exactly one scheme must be supplied: `contract` alone, or both `local_contract` and
    /// `remote_contract`. Empty names are treated as absent.
    pub fn contracts(&self) -> Result<ContractNames, Error> {
        fn present(name: &Option<String>) -> Option<&str> {
            name.as_deref().filter(|n| !n.is_empty())
        }
        match (
            present(&self.contract),
            present(&self.local_contract),
            present(&self.remote_contract),
        ) {
            (Some(contract), None, None) => Ok(ContractNames::Shared(contract.to_string())),
            (None, Some(local), Some(remote)) => Ok(ContractNames::Distinct {
                local: local.to_string(),
                remote: remote.to_string(),
            }),
            _ => Err(Error::InvalidRequest),
        }
    }
}

/// A single link to establish from `source` to `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTask {
    pub source: String,
    pub target: String,
    pub contracts: ContractNames,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn request(contract: Option<&str>, local: Option<&str>, remote: Option<&str>) -> Request {
        Request {
            mode: Mode::Test,
            contract: contract.map(String::from),
            local_contract: local.map(String::from),
            remote_contract: remote.map(String::from),
        }
    }

    #[test_case("test", Mode::Test; "test")]
    #[test_case("production", Mode::Production; "production")]
    #[test_case("mainnet", Mode::Production; "unknown value")]
    #[test_case("", Mode::Production; "empty")]
    #[test_case("Test", Mode::Production; "case sensitive")]
    fn test_mode_from_str(value: &str, expected: Mode) {
        assert_eq!(Mode::from(value), expected);
    }

    #[test]
    fn test_shared_contract() {
        let names = request(Some("OFT"), None, None).contracts().unwrap();
        assert_eq!(names, ContractNames::Shared("OFT".to_string()));
    }

    #[test]
    fn test_distinct_contracts() {
        let names = request(None, Some("ProxyOFT"), Some("OFT"))
            .contracts()
            .unwrap();
        assert_eq!(
            names,
            ContractNames::Distinct {
                local: "ProxyOFT".to_string(),
                remote: "OFT".to_string(),
            }
        );
    }

    #[test_case(None, None, None; "nothing")]
    #[test_case(None, Some("ProxyOFT"), None; "local only")]
    #[test_case(None, None, Some("OFT"); "remote only")]
    #[test_case(Some("OFT"), Some("ProxyOFT"), Some("OFT"); "both schemes")]
    #[test_case(Some("OFT"), Some("ProxyOFT"), None; "contract and local")]
    #[test_case(Some(""), None, None; "empty contract")]
    #[test_case(None, Some(""), Some("OFT"); "empty local")]
    fn test_invalid_request(contract: Option<&str>, local: Option<&str>, remote: Option<&str>) {
        let result = request(contract, local, remote).contracts();
        assert!(matches!(result, Err(Error::InvalidRequest)));
    }
}
