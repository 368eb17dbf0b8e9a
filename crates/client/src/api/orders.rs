//! Order placement and history endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use oakline_core::OrderId;

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{Order, ShippingAddress};

use super::Ack;

/// Body of the create-order call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<CreateOrderItem>,
    pub shipping_address: ShippingAddress,
}

/// One cart line as submitted to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderItem {
    pub product: String,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OrderRef {
    #[serde(rename = "_id")]
    id: OrderId,
}

/// Response of the create-order call: the provisional order plus the
/// references the payment widget needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    order: OrderRef,
    pub payment_order_id: String,
    pub payment_key_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateOrderResponse {
    /// Id of the provisional order.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order.id
    }
}

/// Body of the payment verification call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: OrderId,
    pub payment_order_id: String,
    pub payment_id: String,
    pub payment_signature: String,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    order: Order,
}

#[derive(Debug, Serialize)]
struct CancelRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Order service.
#[derive(Clone)]
pub struct OrderApi {
    gateway: Gateway,
}

impl OrderApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Create a provisional order and obtain payment references.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn create(&self, request: &CreateOrderRequest) -> Result<CreateOrderResponse, ApiError> {
        self.gateway.post("/api/orders/create", request).await
    }

    /// Report a completed widget payment for backend verification.
    ///
    /// The order only becomes confirmed once this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn verify_payment(&self, request: &VerifyPaymentRequest) -> Result<Ack, ApiError> {
        self.gateway.post("/api/orders/verify-payment", request).await
    }

    /// List the signed-in user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self.gateway.get("/api/orders/my-orders").await?;
        Ok(response.orders)
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn get(&self, id: &OrderId) -> Result<Order, ApiError> {
        let response: OrderResponse = self.gateway.get(&format!("/api/orders/{id}")).await?;
        Ok(response.order)
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn cancel(&self, id: &OrderId, reason: Option<&str>) -> Result<Order, ApiError> {
        let response: OrderResponse = self
            .gateway
            .put(&format!("/api/orders/{id}/cancel"), &CancelRequest { reason })
            .await?;
        Ok(response.order)
    }
}
