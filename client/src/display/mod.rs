//! Display surface abstraction
//!
//! This module decouples the controller's sequencing from any concrete
//! terminal handling. The transition methods are async and resolve when
//! the transition has completed; the controller awaits `hide_results`
//! before issuing a fetch, so the gating logic is testable without a real
//! terminal.

use async_trait::async_trait;

use crate::render::RecordBlock;

mod plain;
mod terminal;

pub use plain::PlainSurface;
pub use terminal::TerminalSurface;

/// Trait for display surfaces
#[async_trait]
pub trait DisplaySurface: Send + Sync {
    /// Make the loading indicator visible.
    async fn show_loading(&self);

    /// Remove the loading indicator.
    async fn hide_loading(&self);

    /// Collapse the results region. Resolves once the collapse transition
    /// has completed.
    async fn hide_results(&self);

    /// Reveal the results region with its current content.
    async fn show_results(&self);

    /// Replace the entire content of the results region.
    async fn render(&self, blocks: &[RecordBlock]);

    /// Show a failure message in place of results.
    async fn show_error(&self, message: &str);
}
