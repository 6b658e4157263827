//! HTTP route handlers, one module per resource.
//!
//! Every handler except `/health` and `/auth/login` takes a [`Principal`]
//! argument, so an unauthenticated request is rejected before the body is
//! read.
//!
//! [`Principal`]: crate::auth::Principal

pub mod auth;
pub mod billing;
pub mod health;
pub mod owner;
pub mod products;
pub mod reports;
