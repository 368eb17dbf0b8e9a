//! Typed wrappers over the backend's REST endpoints.
//!
//! Each service holds a [`Gateway`](crate::gateway::Gateway) clone and maps
//! one backend resource. Request and response DTOs live next to the service
//! that uses them; shared shapes live here.

mod admin;
mod auth;
mod orders;
mod products;

pub use admin::{AdminApi, AdminLoginResponse};
pub use auth::{AuthApi, LoginResponse};
pub use orders::{
    CreateOrderItem, CreateOrderRequest, CreateOrderResponse, OrderApi, VerifyPaymentRequest,
};
pub use products::ProductApi;

use serde::Deserialize;

/// Generic acknowledgement body used by several endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
