//! Admin console endpoints.

use serde::{Deserialize, Serialize};

use oakline_core::{OrderId, ProductId};

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::models::{AdminProfile, Order, OrderStatus, Product, ProductForm, UserProfile};

/// Response of the admin login endpoint.
///
/// The backend has been observed to answer 200 with an incomplete body, so
/// both fields stay optional here and the session layer validates the shape
/// before trusting it.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct AdminLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    order: Order,
}

/// Admin console service.
#[derive(Clone)]
pub struct AdminApi {
    gateway: Gateway,
}

impl AdminApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Sign in to the admin console.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminLoginResponse, ApiError> {
        self.gateway
            .post("/api/admin/login", &AdminLoginRequest { email, password })
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        let response: ProductResponse = self.gateway.post("/api/products", form).await?;
        Ok(response.product)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn update_product(
        &self,
        id: &ProductId,
        form: &ProductForm,
    ) -> Result<Product, ApiError> {
        let response: ProductResponse = self
            .gateway
            .put(&format!("/api/products/{id}"), form)
            .await?;
        Ok(response.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.gateway.delete(&format!("/api/products/{id}")).await
    }

    /// List every order in the store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self.gateway.get("/api/orders").await?;
        Ok(response.orders)
    }

    /// Move an order to a new fulfillment status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let response: OrderResponse = self
            .gateway
            .put(
                &format!("/api/orders/{id}/status"),
                &UpdateStatusRequest { status },
            )
            .await?;
        Ok(response.order)
    }

    /// List registered users.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the gateway.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        let response: UsersResponse = self.gateway.get("/api/users").await?;
        Ok(response.users)
    }
}
