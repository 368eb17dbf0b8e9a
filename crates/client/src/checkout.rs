//! Checkout flow.
//!
//! Order placement is a strict sequence: create a provisional order, hand
//! the payment references to the payment widget, report the widget's result
//! for backend verification, and only then clear the cart. Any failure
//! before verification leaves the cart exactly as it was so the user can
//! retry.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use oakline_core::{CurrencyCode, OrderId, Price};

use crate::api::{CreateOrderItem, CreateOrderRequest, OrderApi, VerifyPaymentRequest};
use crate::cart::Cart;
use crate::error::ApiError;
use crate::models::ShippingAddress;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Tax rate applied to the item subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Client-side price preview shown before the backend computes the
/// authoritative figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingQuote {
    pub items_total: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Quote shipping and tax for an item subtotal.
#[must_use]
pub fn quote(items_total: Decimal) -> PricingQuote {
    let shipping = if items_total >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    };
    let tax = (items_total * TAX_RATE).round_dp(2);
    PricingQuote {
        items_total,
        shipping,
        tax,
        total: items_total + shipping + tax,
    }
}

/// Errors from the payment widget.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The user dismissed the widget without paying.
    #[error("payment cancelled")]
    Cancelled,

    /// The widget reported a failed payment attempt.
    #[error("payment failed: {0}")]
    Failed(String),
}

/// What the payment widget needs to collect a payment.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Provider-side order reference from order creation.
    pub payment_order_id: String,
    /// Publishable provider key.
    pub payment_key_id: String,
    /// Amount to collect; widgets take it in minor units via
    /// [`Price::minor_units`].
    pub amount: Price,
    /// Human-readable description shown in the widget.
    pub description: String,
}

/// Proof of payment handed back by the widget, to be verified server-side.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub payment_signature: String,
}

/// The external payment widget.
///
/// The real implementation drives the provider's UI; tests script it.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    /// Collect a payment, blocking until the user completes or abandons it.
    async fn collect(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
}

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was started with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A backend call failed. The cart is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The payment widget did not produce a confirmation. The cart is
    /// unchanged and the provisional order stays pending on the backend.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Place an order for the cart's contents.
///
/// On success the cart is emptied and closed and the confirmed order id is
/// returned. On any failure the cart is left untouched.
///
/// # Errors
///
/// Returns `CheckoutError` if the cart is empty, a backend call fails, or
/// the payment widget does not complete.
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub async fn place_order(
    cart: &mut Cart,
    orders: &OrderApi,
    widget: &dyn PaymentWidget,
    shipping_address: ShippingAddress,
) -> Result<OrderId, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let request = CreateOrderRequest {
        order_items: cart
            .lines()
            .iter()
            .map(|line| CreateOrderItem {
                product: line.product_id.to_string(),
                title: line.name.clone(),
                price: line.unit_price,
                quantity: line.quantity,
                image: line.image.clone(),
            })
            .collect(),
        shipping_address,
    };

    let created = orders.create(&request).await?;
    let order_id = created.order_id().clone();
    info!(%order_id, "provisional order created");

    let payment = PaymentRequest {
        payment_order_id: created.payment_order_id.clone(),
        payment_key_id: created.payment_key_id.clone(),
        amount: Price::new(quote(cart.total_price()).total, CurrencyCode::INR),
        description: format!("Oakline order {order_id}"),
    };
    let confirmation = match widget.collect(&payment).await {
        Ok(confirmation) => confirmation,
        Err(err) => {
            warn!(%order_id, %err, "payment widget did not complete");
            return Err(err.into());
        }
    };

    // The cart survives until the backend has verified the payment.
    orders
        .verify_payment(&VerifyPaymentRequest {
            order_id: order_id.clone(),
            payment_order_id: created.payment_order_id,
            payment_id: confirmation.payment_id,
            payment_signature: confirmation.payment_signature,
        })
        .await?;

    cart.clear();
    cart.set_open(false);
    info!(%order_id, "order confirmed");
    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_shipping_below_threshold() {
        let q = quote(Decimal::from(60));
        assert_eq!(q.shipping, Decimal::from(10));
        assert_eq!(q.tax, Decimal::new(1080, 2));
        assert_eq!(q.total, Decimal::new(8080, 2));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let q = quote(Decimal::from(100));
        assert_eq!(q.shipping, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::from(18));
        assert_eq!(q.total, Decimal::from(118));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let q = quote(Decimal::new(3333, 2));
        // 33.33 * 0.18 = 5.9994, rounded to 6.00
        assert_eq!(q.tax, Decimal::new(600, 2));
    }
}
