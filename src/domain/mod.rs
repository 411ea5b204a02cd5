//! Domain layer containing business entities and rules.
//!
//! Nothing in here knows about HTTP or SQL text; the pure rules (shipping,
//! pricing, delivery, slugs) are plain functions over entities and the
//! repository traits are the only contract with storage.
//!
//! # Architecture
//!
//! - [`entities`] - Marketplace data structures
//! - [`repositories`] - Data access trait definitions
//! - [`shipping`], [`pricing`], [`delivery`], [`slug`] - Pure business rules
//! - [`view_event`] - Product view event model
//! - [`view_worker`] - Asynchronous view counter
//!
//! # View Processing Flow
//!
//! 1. A product page is served
//! 2. [`view_event::ProductView`] is sent to a bounded channel (dropped when full)
//! 3. [`view_worker::run_view_worker`] aggregates events and persists them with retry
//! 4. Counters are written via [`repositories::ProductRepository::record_views`]

#[macro_use]
pub mod text_enum;

pub mod delivery;
pub mod entities;
pub mod pricing;
pub mod repositories;
pub mod shipping;
pub mod slug;
pub mod view_event;
pub mod view_worker;
