//! Seam: Capability-Segregated Strategy Engine
//!
//! Resolves a runtime key to a behaviour implementation through narrow,
//! consumer-owned contracts. Providers are checked against a contract when
//! they register, looked up by explicit key, and invoked only through the
//! contract, so one provider can replace another without the consumer
//! noticing.
//!
//! - [`contract`]: immutable contract descriptors and the structural
//!   substitutability check
//! - [`registry`]: the `(key, contract) -> provider` table
//! - [`facade`]: the single consumer entry point

pub mod config;
pub mod contract;
pub mod error;
pub mod facade;
pub mod logging;
pub mod provider;
pub mod registry;

pub use contract::{Contract, ContractCatalog, OperationSignature, Shape};
pub use error::{EngineError, ProviderError};
pub use facade::{Bindings, Resolution, ResolutionFacade};
pub use provider::{FnProvider, Provider};
pub use registry::{KeyListing, StrategyRegistry};
