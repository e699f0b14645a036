// ip360-api: Async Rust client for the IP360 appliance XML-RPC API

pub mod auth;
pub mod client;
pub mod error;
pub mod scan;
pub mod search;
pub mod transport;
pub mod xmlrpc;

pub use auth::{API_VERSION, LOGIN_FLAGS, SessionToken};
pub use client::Ip360Client;
pub use error::Error;
pub use scan::ScanParams;
pub use search::{EntityClass, name_query};
pub use transport::{TlsVerification, TransportConfig};
pub use xmlrpc::{MethodCall, Value};
