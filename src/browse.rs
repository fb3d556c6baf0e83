//! Focus-navigable list of catalog rows.
//!
//! Rows consume only confirm keys (center/enter) and turn them into a
//! [`PlayRequest`]. Everything else bubbles to the list, which moves focus on
//! up/down and passes the rest on to the host.

use crate::catalog::Catalog;
use crate::input::{Handled, Key, KeyEvent};
use std::sync::Arc;

/// Payload handed from the list to the playback screen.
///
/// Fields are optional like navigation extras; the receiver validates them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayRequest {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl PlayRequest {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: Some(title.into()),
        }
    }
}

/// Result of routing a key through the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// A row was confirmed; the host should open the player.
    Activate(PlayRequest),
    /// Focus moved to this row.
    FocusMoved(usize),
    /// Not handled here.
    PassThrough,
}

impl ListOutcome {
    pub fn handled(&self) -> Handled {
        match self {
            ListOutcome::PassThrough => Handled::PassThrough,
            _ => Handled::Consumed,
        }
    }
}

/// One rendered row. Every row is focusable and clickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    index: usize,
}

impl Row {
    /// Row-level key listener: confirm on key-down activates, all else bubbles.
    fn on_key(&self, event: KeyEvent) -> Handled {
        if event.is_down() && event.key.is_confirm() {
            Handled::Consumed
        } else {
            Handled::PassThrough
        }
    }
}

#[derive(Debug)]
pub struct ListSurface {
    catalog: Arc<Catalog>,
    rows: Vec<Row>,
    focus: Option<usize>,
}

impl ListSurface {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let rows = (0..catalog.len()).map(|index| Row { index }).collect();
        Self {
            catalog,
            rows,
            focus: None,
        }
    }

    /// Called once layout completes. Focuses the first row so the remote works
    /// without any pointer interaction.
    pub fn on_layout_complete(&mut self) {
        if self.focus.is_none() && !self.rows.is_empty() {
            self.focus = Some(0);
            tracing::debug!("Initial focus on row 0");
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    /// Move focus to `index`; out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.focus = Some(index);
            true
        } else {
            false
        }
    }

    /// Dispatch a key: focused row first, then the list.
    pub fn handle_key(&mut self, event: KeyEvent) -> ListOutcome {
        if let Some(row) = self.focus.and_then(|i| self.rows.get(i).copied()) {
            if row.on_key(event).is_consumed() {
                return self.activate(row.index);
            }
        }

        if !event.is_down() {
            return ListOutcome::PassThrough;
        }

        let Some(current) = self.focus else {
            return ListOutcome::PassThrough;
        };

        let target = match event.key {
            Key::DpadUp => current.checked_sub(1),
            Key::DpadDown => Some(current + 1).filter(|&i| i < self.rows.len()),
            _ => None,
        };

        match target {
            Some(index) => {
                self.focus = Some(index);
                ListOutcome::FocusMoved(index)
            }
            None => ListOutcome::PassThrough,
        }
    }

    /// Pointer activation of a row.
    pub fn click(&mut self, index: usize) -> ListOutcome {
        if !self.focus(index) {
            return ListOutcome::PassThrough;
        }
        self.activate(index)
    }

    fn activate(&self, index: usize) -> ListOutcome {
        match self.catalog.get(index) {
            Some(item) => {
                tracing::info!("Activated row {}: {}", index, item.title());
                ListOutcome::Activate(PlayRequest::new(item.uri(), item.title()))
            }
            None => ListOutcome::PassThrough,
        }
    }

    /// Text rendering, one line per row, focused row marked with `>`.
    pub fn render(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| {
                let item = self.catalog.get(row.index)?;
                let marker = if self.focus == Some(row.index) { '>' } else { ' ' };
                let thumb = item.thumbnail().name().unwrap_or("-");
                Some(format!("{} {}. [{}] {}", marker, row.index + 1, thumb, item.title()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use assert_matches::assert_matches;

    fn surface() -> ListSurface {
        let catalog = Arc::new(Catalog::bundled(&LibraryConfig::default()));
        let mut list = ListSurface::new(catalog);
        list.on_layout_complete();
        list
    }

    #[test]
    fn test_first_row_focused_after_layout() {
        let catalog = Arc::new(Catalog::bundled(&LibraryConfig::default()));
        let mut list = ListSurface::new(catalog);
        assert_eq!(list.focused(), None);
        list.on_layout_complete();
        assert_eq!(list.focused(), Some(0));

        list.focus(2);
        list.on_layout_complete();
        assert_eq!(list.focused(), Some(2));
    }

    #[test]
    fn test_empty_catalog_has_no_focus() {
        let mut list = ListSurface::new(Arc::new(Catalog::new(Vec::new())));
        list.on_layout_complete();
        assert_eq!(list.focused(), None);
        assert_eq!(list.handle_key(KeyEvent::down(Key::Enter)), ListOutcome::PassThrough);
    }

    #[test]
    fn test_up_down_move_focus() {
        let mut list = surface();
        assert_eq!(list.handle_key(KeyEvent::down(Key::DpadDown)), ListOutcome::FocusMoved(1));
        assert_eq!(list.handle_key(KeyEvent::down(Key::DpadDown)), ListOutcome::FocusMoved(2));
        assert_eq!(list.handle_key(KeyEvent::down(Key::DpadDown)), ListOutcome::PassThrough);
        assert_eq!(list.focused(), Some(2));
        assert_eq!(list.handle_key(KeyEvent::down(Key::DpadUp)), ListOutcome::FocusMoved(1));
    }

    #[test]
    fn test_up_at_top_passes_through() {
        let mut list = surface();
        let outcome = list.handle_key(KeyEvent::down(Key::DpadUp));
        assert_eq!(outcome, ListOutcome::PassThrough);
        assert_eq!(outcome.handled(), Handled::PassThrough);
        assert_eq!(list.focused(), Some(0));
    }

    #[test]
    fn test_confirm_keys_activate_focused_row() {
        let mut list = surface();
        list.handle_key(KeyEvent::down(Key::DpadDown));

        let outcome = list.handle_key(KeyEvent::down(Key::DpadCenter));
        assert_matches!(&outcome, ListOutcome::Activate(req) => {
            assert_eq!(req.uri.as_deref(), Some("resource://tvreel/raw/video2"));
            assert_eq!(req.title.as_deref(), Some("المقدمة الرسمية لكأس السوبر السعودي"));
        });
        assert_eq!(outcome.handled(), Handled::Consumed);

        assert_matches!(list.handle_key(KeyEvent::down(Key::Enter)), ListOutcome::Activate(_));
    }

    #[test]
    fn test_key_up_phase_is_ignored() {
        let mut list = surface();
        assert_eq!(list.handle_key(KeyEvent::up(Key::Enter)), ListOutcome::PassThrough);
        assert_eq!(list.handle_key(KeyEvent::up(Key::DpadDown)), ListOutcome::PassThrough);
        assert_eq!(list.focused(), Some(0));
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut list = surface();
        assert_eq!(list.handle_key(KeyEvent::down(Key::DpadLeft)), ListOutcome::PassThrough);
        assert_eq!(list.handle_key(KeyEvent::down(Key::Back)), ListOutcome::PassThrough);
        assert_eq!(list.handle_key(KeyEvent::down(Key::Other(85))), ListOutcome::PassThrough);
    }

    #[test]
    fn test_click_activates_and_focuses() {
        let mut list = surface();
        assert_matches!(list.click(2), ListOutcome::Activate(req) => {
            assert_eq!(req.uri.as_deref(), Some("resource://tvreel/raw/video3"));
        });
        assert_eq!(list.focused(), Some(2));
        assert_eq!(list.click(7), ListOutcome::PassThrough);
    }

    #[test]
    fn test_render_marks_focus() {
        let mut list = surface();
        list.handle_key(KeyEvent::down(Key::DpadDown));
        let lines = list.render();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  1. [thumb1]"));
        assert!(lines[1].starts_with("> 2. [thumb2]"));
    }
}
