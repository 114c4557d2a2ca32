//! Typed client for the portal HTTP database API.
//!
//! ```no_run
//! # async fn run() -> phd_client::Result<()> {
//! use phd_client::{Config, Reader};
//!
//! let config = Config::new("https://db.example.com", "api-key", "v1");
//! let reader = phd_client::new_read_only(&config)?;
//! for chain in reader.blockchains().await? {
//!     println!("{} {}", chain.id, chain.ticker);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod resources;

pub use client::{DbClient, new_clients, new_read_only, new_read_write};
pub use config::{ApiVersion, Config};
pub use endpoint::Endpoint;
pub use error::{Error, Result, TransportError};
pub use resources::{
    Application, Blockchain, LoadBalancer, LoadBalancerUser, NewApplication, NewPortalUser,
    PayPlan, PortalUserId, Reader, RoleName, UpdateApplication, UpdateLoadBalancer, Writer,
};
