//! Plain surface for pipes and one-shot queries
//!
//! No transitions, no styling - blocks are printed as clean text the
//! moment they are rendered.

use async_trait::async_trait;

use super::DisplaySurface;
use crate::render::RecordBlock;

/// Plain text surface (no transitions, no ANSI)
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainSurface;

impl PlainSurface {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DisplaySurface for PlainSurface {
    async fn show_loading(&self) {}

    async fn hide_loading(&self) {}

    async fn hide_results(&self) {}

    async fn show_results(&self) {}

    async fn render(&self, blocks: &[RecordBlock]) {
        for block in blocks {
            println!("{}", block.intro());
            println!("  {} ({})", block.title, block.link);
            if !block.note.is_empty() {
                println!("  {}", block.note);
            }
            println!();
        }
    }

    async fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}
