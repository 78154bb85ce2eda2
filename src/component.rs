//! Component trait - Interface for UI components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// The pattern follows:
/// 1. `handle_key_event` / `handle_mouse_event` / `handle_paste` - Convert events to Actions
/// 2. `update` - Process Actions and update state
/// 3. `draw` - Render the component
pub trait Component {
    /// Initialize the component
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Handle a key event, returning an optional Action
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Handle a mouse event, returning an optional Action
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Handle text pasted into the terminal
    ///
    /// Only components with a text field care; the default drops the text.
    fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
        let _ = text;
        Ok(None)
    }

    /// Update component state based on an Action
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component to the frame
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
