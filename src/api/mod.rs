//! JSON API mounted under `/api`.
//!
//! Handlers stay thin: they extract and validate input, call one service and
//! serialize the result. Errors surface as [`crate::error::AppError`].
//!
//! - [`dto`] - Request bodies and query strings with their validation rules
//! - [`handlers`] - One module per resource
//! - [`middleware`] - Bearer authentication, rate limiting, request tracing
//! - [`routes`] - Public, customer, seller and admin routers

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
