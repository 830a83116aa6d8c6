//! Backend gateways for the prompt manager.
//!
//! [`traits::PromptGateway`] describes the REST contract. [`http::HttpGateway`]
//! speaks it over the network; [`local::LocalGateway`] binds it directly to a
//! [`prompt_store::PromptStore`] in the same process.

#![warn(missing_docs, clippy::pedantic)]

pub mod http;
pub mod local;
pub mod traits;

mod http_client;

pub use http::{HttpGateway, HttpGatewayConfig};
pub use local::LocalGateway;
pub use traits::{GatewayError, GatewayResult, ImageUpload, PromptGateway};
