//! Debounced client for the exemplar article search service
//!
//! The service ranks published articles by how prototypical they are for
//! their news agency and serves them over two JSON endpoints. This crate
//! is the reading side: it debounces keystrokes, routes the empty query to
//! the prototypical listing, fetches, and renders result blocks onto a
//! display surface with a loading indicator around every fetch.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use exemplar_client::{HttpQueryService, SearchController};
//! use exemplar_client::config::Config;
//! use exemplar_client::display::PlainSurface;
//!
//! let config = Config::load()?;
//! let service = Arc::new(HttpQueryService::new(&config.service)?);
//! let controller = SearchController::new(service, Arc::new(PlainSurface::new()));
//! controller.submit("climate").await;
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod input;
pub mod render;
pub mod service;
pub mod telemetry;
pub mod types;

// Re-export main types
pub use controller::SearchController;
pub use service::{HttpQueryService, QueryService};
pub use types::{Record, ResultSet};
