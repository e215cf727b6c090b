// sgtpolicy-api: Async Rust client for Cisco DNA Center group-based policy APIs

pub mod auth;
pub mod client;
pub mod contracts;
pub mod error;
pub mod models;
pub mod policy;
pub mod security_groups;
pub mod task;
pub mod transport;

pub use auth::{AuthScheme, Credentials};
pub use client::{ClientConfig, DnacClient};
pub use contracts::RESERVED_CONTRACTS;
pub use error::Error;
pub use policy::PolicyMode;
pub use security_groups::{DeployVerify, SecurityGroupUpdate, DEFAULT_VN};
pub use transport::{TlsMode, TransportConfig};
