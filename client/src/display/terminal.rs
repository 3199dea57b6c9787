//! ANSI terminal surface
//!
//! Uses raw ANSI escape codes for positioning and styling. The screen has
//! a fixed layout: the search line on top, a loading indicator line and
//! the results region below it. Collapse and reveal run as short
//! frame-stepped transitions whose completion gates the controller's next
//! step.

use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::DisplaySurface;
use crate::render::RecordBlock;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";

const CLEAR_LINE: &str = "\x1b[2K";
const CLEAR_DOWN: &str = "\x1b[0J";
const CLEAR_SCREEN: &str = "\x1b[2J";

// Screen rows of the fixed layout (0-based)
const QUERY_ROW: u16 = 0;
const HINT_ROW: u16 = 1;
const LOADING_ROW: u16 = 3;
const RESULTS_ROW: u16 = 5;

const QUERY_PROMPT: &str = "Search: ";

/// Steps a collapse or reveal transition is drawn in
const TRANSITION_FRAMES: usize = 4;

/// Delay between transition frames
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(25);

fn move_to(row: u16, col: u16) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}

#[derive(Default)]
struct SurfaceState {
    query: String,
    blocks: Vec<RecordBlock>,
    lines_drawn: usize,
}

/// Display surface drawing to the controlling terminal
pub struct TerminalSurface {
    state: Mutex<SurfaceState>,
    use_ansi: bool,
    frame_delay: Duration,
}

impl TerminalSurface {
    /// Create a new terminal surface
    pub fn new(use_ansi: bool) -> Self {
        Self {
            state: Mutex::new(SurfaceState::default()),
            use_ansi,
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }

    /// Override the transition frame delay (zero disables frame pacing)
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// Clear the screen and draw the static chrome (prompt and hint).
    pub async fn draw_chrome(&self) {
        let state = self.state.lock().await;

        let mut out = String::new();
        out.push_str(CLEAR_SCREEN);
        out.push_str(&move_to(QUERY_ROW, 0));
        out.push_str(QUERY_PROMPT);
        out.push_str(&move_to(HINT_ROW, 0));
        out.push_str(&self.style(DIM, "type to search; Esc quits"));
        out.push_str(&self.query_cursor(&state));
        self.flush(out);
    }

    /// Redraw the search line with the current input buffer.
    pub async fn set_query_line(&self, query: &str) {
        let mut state = self.state.lock().await;
        state.query = query.to_string();

        let mut out = String::new();
        out.push_str(&move_to(QUERY_ROW, 0));
        out.push_str(CLEAR_LINE);
        out.push_str(QUERY_PROMPT);
        out.push_str(query);
        out.push_str(&self.query_cursor(&state));
        self.flush(out);
    }

    /// Format with a style code if ANSI is enabled
    fn style(&self, code: &str, text: &str) -> String {
        if self.use_ansi {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Format a link; OSC 8 hyperlink when ANSI is enabled
    fn link(&self, text: &str, url: &str) -> String {
        if self.use_ansi {
            format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
        } else {
            format!("{} ({})", text, url)
        }
    }

    /// Lines of the results region for the given blocks
    fn block_lines(&self, blocks: &[RecordBlock]) -> Vec<String> {
        let mut lines = Vec::new();

        for block in blocks {
            lines.push(format!(
                "The most {}-like article published by {} was:",
                self.style(BOLD, &block.source_name),
                block.source_name
            ));
            lines.push(format!("  {}", self.link(&block.title, &block.link)));
            if !block.note.is_empty() {
                lines.push(format!("  {}", self.style(DIM, &block.note)));
            }
            lines.push(String::new());
        }

        lines
    }

    /// Escape sequence putting the cursor back at the end of the search line
    fn query_cursor(&self, state: &SurfaceState) -> String {
        let col = QUERY_PROMPT.len() + state.query.chars().count();
        move_to(QUERY_ROW, col as u16)
    }

    fn flush(&self, out: String) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(out.as_bytes());
        let _ = stdout.flush();
    }

    async fn pace(&self) {
        if !self.frame_delay.is_zero() {
            tokio::time::sleep(self.frame_delay).await;
        }
    }
}

#[async_trait]
impl DisplaySurface for TerminalSurface {
    async fn show_loading(&self) {
        let state = self.state.lock().await;

        let mut out = String::new();
        out.push_str(&move_to(LOADING_ROW, 0));
        out.push_str(CLEAR_LINE);
        out.push_str(&self.style(DIM, "Loading results..."));
        out.push_str(&self.query_cursor(&state));
        self.flush(out);
    }

    async fn hide_loading(&self) {
        let state = self.state.lock().await;

        let mut out = String::new();
        out.push_str(&move_to(LOADING_ROW, 0));
        out.push_str(CLEAR_LINE);
        out.push_str(&self.query_cursor(&state));
        self.flush(out);
    }

    async fn hide_results(&self) {
        let mut state = self.state.lock().await;
        if state.lines_drawn == 0 {
            return;
        }

        // Collapse from the bottom up, a chunk of lines per frame
        let per_frame = state.lines_drawn.div_ceil(TRANSITION_FRAMES);
        let mut remaining = state.lines_drawn;
        while remaining > 0 {
            let clear_from = remaining.saturating_sub(per_frame);

            let mut out = String::new();
            for line in clear_from..remaining {
                out.push_str(&move_to(RESULTS_ROW + line as u16, 0));
                out.push_str(CLEAR_LINE);
            }
            out.push_str(&self.query_cursor(&state));
            self.flush(out);

            remaining = clear_from;
            if remaining > 0 {
                self.pace().await;
            }
        }

        state.lines_drawn = 0;
    }

    async fn show_results(&self) {
        let mut state = self.state.lock().await;
        let lines = self.block_lines(&state.blocks);

        // Make sure no stale content survives below the new region
        let mut out = String::new();
        out.push_str(&move_to(RESULTS_ROW, 0));
        out.push_str(CLEAR_DOWN);
        out.push_str(&self.query_cursor(&state));
        self.flush(out);

        // Reveal top-down, a chunk of lines per frame
        let per_frame = lines.len().div_ceil(TRANSITION_FRAMES).max(1);
        let mut drawn = 0;
        while drawn < lines.len() {
            let until = (drawn + per_frame).min(lines.len());

            let mut out = String::new();
            for (offset, line) in lines[drawn..until].iter().enumerate() {
                out.push_str(&move_to(RESULTS_ROW + (drawn + offset) as u16, 0));
                out.push_str(CLEAR_LINE);
                out.push_str(line);
            }
            out.push_str(&self.query_cursor(&state));
            self.flush(out);

            drawn = until;
            if drawn < lines.len() {
                self.pace().await;
            }
        }

        state.lines_drawn = lines.len();
    }

    async fn render(&self, blocks: &[RecordBlock]) {
        let mut state = self.state.lock().await;
        state.blocks = blocks.to_vec();
    }

    async fn show_error(&self, message: &str) {
        let mut state = self.state.lock().await;

        let mut out = String::new();
        out.push_str(&move_to(RESULTS_ROW, 0));
        out.push_str(CLEAR_DOWN);
        out.push_str(&self.style(RED, &format!("! {}", message)));
        out.push_str(&self.query_cursor(&state));
        self.flush(out);

        state.lines_drawn = 1;
    }
}
