//! Service Discovery Primitives
//!
//! This crate provides the value types and load balancing shared by service
//! discovery clients.
//!
//! ## Features
//!
//! - **Service Instances** - Validated, immutable records of running instances
//! - **Wire Format** - Canonical JSON encoding for registries
//! - **Load Balancing** - Pluggable strategies, uniform random built in
//! - **Configuration** - Payload limits from code or environment
//!
//! ## Quick Start
//!
//! ```rust
//! use soa_discovery::*;
//!
//! // Register side: build and encode an instance
//! let instance = ServiceInstance::new(
//!     "FooService",
//!     "server:8080".parse::<HostAndPort>()?,
//!     None,
//! )?;
//! let json = instance.to_json();
//!
//! // Discovery side: decode candidates and pick one
//! let candidates = vec![ServiceInstance::from_json(&json)?];
//! let chosen = RandomAlgorithm::new().choose(&candidates)?;
//! assert_eq!(chosen.port(), 8080);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod instance;
pub mod loadbalance;
pub mod validation;

pub use address::HostAndPort;
pub use config::{InstanceConfig, MAX_PAYLOAD_SIZE_ENV, MAX_PAYLOAD_SIZE_IN_CHARACTERS};
pub use error::{Result, DiscoveryError, ValidationError};
pub use instance::{ServiceInstance, ServiceInstanceBuilder};
pub use loadbalance::{LoadBalanceAlgorithm, RandomAlgorithm};
