//! Interactive terminal mode
//!
//! Owns the terminal for its lifetime: raw mode plus alternate screen,
//! with an async key-event stream. Printable keys and backspace edit the
//! search line; every edit feeds the debouncer with the full buffer. The
//! startup submission runs before the first keystroke so prototypical
//! results appear on load.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::execute;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::controller::SearchController;
use crate::debounce::Debouncer;
use crate::display::TerminalSurface;

/// The interactive search application
pub struct InteractiveApp {
    controller: Arc<SearchController>,
    surface: Arc<TerminalSurface>,
    debounce: Duration,
}

impl InteractiveApp {
    pub fn new(
        controller: Arc<SearchController>,
        surface: Arc<TerminalSurface>,
        debounce: Duration,
    ) -> Self {
        Self {
            controller,
            surface,
            debounce,
        }
    }

    /// Run until the user quits. The terminal is restored on the way out,
    /// also when the event loop fails.
    pub async fn run(&self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to enter alternate screen")?;

        let result = self.event_loop().await;

        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    async fn event_loop(&self) -> Result<()> {
        self.surface.draw_chrome().await;

        let (tx, rx) = mpsc::channel::<String>(64);
        let debouncer = Debouncer::new(self.controller.clone(), rx).with_window(self.debounce);
        let debounce_task = tokio::spawn(debouncer.run());

        // Populate prototypical results while the user is still idle
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.start("").await });

        let mut events = EventStream::new();
        let mut buffer = String::new();

        while let Some(event) = events.next().await {
            let event = event.context("failed to read terminal event")?;

            let key = match event {
                Event::Key(key) if key.kind != KeyEventKind::Release => key,
                _ => continue,
            };

            if is_quit(&key) {
                break;
            }

            let edited = match key.code {
                KeyCode::Char(c) => {
                    buffer.push(c);
                    true
                }
                KeyCode::Backspace => buffer.pop().is_some(),
                _ => false,
            };

            if edited {
                self.surface.set_query_line(&buffer).await;
                if tx.send(buffer.clone()).await.is_err() {
                    break;
                }
            }
        }

        drop(tx);
        debounce_task.await.context("debounce task failed")?;

        Ok(())
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_escape_quits() {
        assert!(is_quit(&key(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_plain_keys_do_not_quit() {
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&key(KeyCode::Backspace, KeyModifiers::NONE)));
    }
}
