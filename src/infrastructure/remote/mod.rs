//! # Remote Service Client
//!
//! Typed access to the dealership's catalog, pricing, quotation and
//! reservation API.
//!
//! - [`RemoteService`]: the port every caller depends on
//! - [`HttpRemoteService`]: the REST implementation over [`HttpClient`]
//! - [`InMemoryRemoteService`]: an in-process implementation for tests and
//!   demos
//! - [`ServiceError`]: the normalized failure taxonomy

pub mod credentials;
pub mod dto;
pub mod error;
pub mod http_client;
pub mod http_service;
pub mod in_memory;
pub mod operation;
pub mod traits;

pub use credentials::{AccessToken, CredentialProvider, SessionCredentials};
pub use error::{ServiceError, ServiceResult};
pub use http_client::HttpClient;
pub use http_service::HttpRemoteService;
pub use in_memory::InMemoryRemoteService;
pub use operation::Operation;
pub use traits::{CancellationReceipt, PriceBreakdown, RemoteService};
