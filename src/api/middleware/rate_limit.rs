//! Rate limiting middleware using token bucket algorithm.

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Per-client key: the socket peer address, or the forwarded client address
/// when the service runs behind a trusted reverse proxy.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            // X-Forwarded-For, X-Real-IP, Forwarded, then the peer address.
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn build(behind_proxy: bool, per_second: u64, burst_size: u32) -> RateLimitLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limiter config with non-zero period and burst is valid"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a rate limiter for public endpoints (storefront pages, catalog API).
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer(behind_proxy: bool) -> RateLimitLayer {
    build(behind_proxy, 2, 100)
}

/// Creates a stricter rate limiter for authenticated writes and the
/// payment webhook.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 30 requests
pub fn secure_layer(behind_proxy: bool) -> RateLimitLayer {
    build(behind_proxy, 1, 30)
}
