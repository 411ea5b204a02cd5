//! Utility functions shared by the services, the HTTP layer and the admin CLI.
//!
//! - [`signing`] - HMAC-SHA256 token hashing, webhook signatures and random tokens

pub mod signing;
