//! Domain models mirroring the backend's wire format.
//!
//! All records use `camelCase` field names on the wire and expose the
//! backend's document ids through the type-safe ID wrappers from
//! `oakline-core`.

pub mod admin;
pub mod order;
pub mod product;
pub mod user;

pub use admin::AdminProfile;
pub use order::{
    Order, OrderItem, OrderPricing, OrderStatus, PaymentInfo, PaymentStatus, ShippingAddress,
};
pub use product::{Product, ProductForm};
pub use user::{Address, UserProfile};
