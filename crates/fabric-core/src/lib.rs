//! # Fabric Core
//!
//! Typed domain model for a distributed cluster manager: validated
//! identifiers, discriminated variant families resolved from wire payloads,
//! and the recursive health-evaluation tree.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! Each layer returns its own structured error (`ValidationError`,
//! `IdentifierError`, `ResolutionError`); [`Error`] wraps all of them. Use:
//! - `?` operator for propagation
//! - `map`, `and_then` combinators for transformation
//!
//! ## Resolving a payload
//!
//! ```rust
//! use fabric_core::{service::ServiceDescription, variant::resolve_value};
//! use serde_json::json;
//!
//! let description: ServiceDescription = resolve_value(&json!({
//!     "ServiceKind": "Stateless",
//!     "ServiceName": "fabric:/web/front",
//!     "ServiceTypeName": "FrontType",
//!     "PartitionDescription": { "PartitionScheme": "Singleton" },
//!     "InstanceCount": -1,
//! }))?;
//! assert_eq!(description.service_name().flat_id(), "web~front");
//! # Ok::<(), fabric_core::Error>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod backup;
pub mod config;
mod error;
pub mod events;
pub mod health;
pub mod identifiers;
pub mod paging;
pub mod repair;
pub mod replica;
pub mod service;
pub mod validation;
pub mod variant;
pub mod wire;

pub use config::{Config, ResolverConfig};
pub use error::{Error, Result};
pub use identifiers::{ContinuationToken, HierarchicalName, IdentifierError, NodeName, PartitionId, ReplicaId};
pub use validation::ValidationError;
pub use variant::{Discriminator, ResolutionError, VariantFamily, WireRecord};
