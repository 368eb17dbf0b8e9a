//! Oakline Client - storefront cart and session core.
//!
//! This crate owns the client-side state the Oakline storefront runs on:
//! the shopping cart, the user and admin authentication sessions, and the
//! single HTTP gateway every backend call flows through.
//!
//! # Architecture
//!
//! - [`store`] - Durable key-value credential storage (user and admin slots
//!   live in disjoint namespaces)
//! - [`gateway`] - The one outbound channel to the backend; attaches bearer
//!   tokens per route class and centralizes error handling side effects
//! - [`session`] - Generic session state machine, instantiated once for the
//!   end-user identity and once for the admin identity
//! - [`cart`] - In-memory cart state container
//! - [`guard`] - Admin route gating derived from the admin session
//! - [`checkout`] - Order placement against the payment widget collaborator
//! - [`api`] - Typed wrappers over the backend's REST endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use oakline_client::{config::ClientConfig, gateway::Gateway, session::AuthSession};
//!
//! let config = ClientConfig::from_env()?;
//! let store = Arc::new(FileStore::open(&config.credentials_path)?);
//! let gateway = Gateway::new(&config, store.clone(), notifier, navigator);
//!
//! let auth = AuthSession::new(gateway.clone(), store);
//! auth.restore().await;
//! auth.sign_in("user@example.com", "hunter22!").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod session;
pub mod store;
pub mod validate;

pub use cart::Cart;
pub use error::{ApiError, SessionError, ValidationError};
pub use gateway::Gateway;
pub use session::{AdminSession, AuthSession, SessionState};
