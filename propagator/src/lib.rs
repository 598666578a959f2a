//! Propagate trusted-remote links between contract deployments across networks.
//!
//! After a release is deployed to every network in a [link::NetworkSet], each contract instance
//! must recognize its counterparts on the other networks as authorized message senders. The
//! [link::Propagator] establishes those links from one designated source network to every other
//! network in the set by invoking an external tool once per target, in registry order, and
//! halts on the first failed link.
//!
//! The propagator never talks to a chain itself. It only sequences and supervises invocations
//! of the external tool (by default `hardhat --network <source> setTrustedRemote ...`).
//!
//! # Status
//!
//! `trustlink-propagator` is **ALPHA** software and is not yet recommended for production use.
//! Developers should expect breaking changes and occasional instability.

pub mod link;
