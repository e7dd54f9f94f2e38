#![forbid(unsafe_code)]

//! Interactive field widgets.
//!
//! Each widget owns its value and interprets key events for itself; the
//! form screens only route events to the focused field and react to the
//! returned value-changed flag. Text editing is grapheme-aware so cursor
//! movement and backspace never split a cluster.

use formdeck_runtime::{KeyCode, KeyEvent};

/// Count grapheme clusters in a string.
fn grapheme_count(s: &str) -> usize {
    unicode_segmentation::UnicodeSegmentation::graphemes(s, true).count()
}

/// Get byte offset of the nth grapheme cluster.
fn grapheme_byte_offset(s: &str, grapheme_idx: usize) -> usize {
    unicode_segmentation::UnicodeSegmentation::grapheme_indices(s, true)
        .nth(grapheme_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Compute the display width (cells) of the first `grapheme_count` graphemes.
fn grapheme_display_width(s: &str, grapheme_count: usize) -> usize {
    unicode_segmentation::UnicodeSegmentation::graphemes(s, true)
        .take(grapheme_count)
        .map(unicode_width::UnicodeWidthStr::width)
        .sum()
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// A single-line text input with a grapheme cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    /// An empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` if the value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = grapheme_count(&self.value);
    }

    /// Cursor position in grapheme clusters.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in display columns, for rendering.
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        grapheme_display_width(&self.value, self.cursor)
    }

    /// Route a key to the field. Returns `true` if the value changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.ctrl() || key.alt() {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                let offset = grapheme_byte_offset(&self.value, self.cursor);
                self.value.insert(offset, c);
                self.cursor += 1;
                // An inserted combining mark can merge into the previous
                // cluster, shrinking the grapheme count.
                self.cursor = self.cursor.min(grapheme_count(&self.value));
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let start = grapheme_byte_offset(&self.value, self.cursor - 1);
                let end = grapheme_byte_offset(&self.value, self.cursor);
                self.value.replace_range(start..end, "");
                self.cursor -= 1;
                true
            }
            KeyCode::Delete => {
                if self.cursor >= grapheme_count(&self.value) {
                    return false;
                }
                let start = grapheme_byte_offset(&self.value, self.cursor);
                let end = grapheme_byte_offset(&self.value, self.cursor + 1);
                self.value.replace_range(start..end, "");
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(grapheme_count(&self.value));
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = grapheme_count(&self.value);
                false
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SelectField
// ---------------------------------------------------------------------------

/// A fixed-options selector. The first option may be the empty string,
/// which renders as a "Select" placeholder and fails required checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    options: &'static [&'static str],
    selected: usize,
}

impl SelectField {
    /// A selector over the given options, initially on the first one.
    ///
    /// # Panics
    ///
    /// Panics if `options` is empty.
    #[must_use]
    pub fn new(options: &'static [&'static str]) -> Self {
        assert!(!options.is_empty(), "select needs at least one option");
        Self {
            options,
            selected: 0,
        }
    }

    /// The selected value. Empty string while on the placeholder.
    #[must_use]
    pub fn value(&self) -> &'static str {
        self.options[self.selected]
    }

    /// The label to render: the value, or "Select" on the placeholder.
    #[must_use]
    pub fn display(&self) -> &'static str {
        if self.value().is_empty() {
            "Select"
        } else {
            self.value()
        }
    }

    /// All options, placeholder included.
    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    /// Select by value. Returns `true` if the value changed.
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|&o| o == value) {
            Some(idx) if idx != self.selected => {
                self.selected = idx;
                true
            }
            _ => false,
        }
    }

    /// Route a key to the field. Up/Left step back, Down/Right step
    /// forward; both clamp at the ends. Returns `true` on change.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let next = match key.code {
            KeyCode::Up | KeyCode::Left => self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Right => (self.selected + 1).min(self.options.len() - 1),
            _ => self.selected,
        };
        if next != self.selected {
            self.selected = next;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// CheckboxField
// ---------------------------------------------------------------------------

/// A boolean toggle, flipped with the space bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxField {
    checked: bool,
}

impl CheckboxField {
    /// An unchecked box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Set the state directly.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Route a key to the field. Returns `true` if the state flipped.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.is_char(' ') {
            self.checked = !self.checked;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use formdeck_runtime::Modifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    // -- TextField --

    #[test]
    fn text_insert_at_cursor() {
        let mut field = TextField::new();
        assert!(field.handle_key(&press(KeyCode::Char('a'))));
        assert!(field.handle_key(&press(KeyCode::Char('c'))));
        field.handle_key(&press(KeyCode::Left));
        assert!(field.handle_key(&press(KeyCode::Char('b'))));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn text_backspace_removes_previous_grapheme() {
        let mut field = TextField::new();
        field.set_value("héllo");
        field.handle_key(&press(KeyCode::Home));
        field.handle_key(&press(KeyCode::Right));
        field.handle_key(&press(KeyCode::Right));
        assert!(field.handle_key(&press(KeyCode::Backspace)));
        assert_eq!(field.value(), "hllo");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn text_backspace_at_start_is_noop() {
        let mut field = TextField::new();
        field.set_value("ab");
        field.handle_key(&press(KeyCode::Home));
        assert!(!field.handle_key(&press(KeyCode::Backspace)));
        assert_eq!(field.value(), "ab");
    }

    #[test]
    fn text_delete_removes_at_cursor() {
        let mut field = TextField::new();
        field.set_value("abc");
        field.handle_key(&press(KeyCode::Home));
        assert!(field.handle_key(&press(KeyCode::Delete)));
        assert_eq!(field.value(), "bc");
        assert!(!field.handle_key(&press(KeyCode::End)));
        assert!(!field.handle_key(&press(KeyCode::Delete)));
    }

    #[test]
    fn text_cursor_clamps_to_ends() {
        let mut field = TextField::new();
        field.set_value("ab");
        field.handle_key(&press(KeyCode::Right));
        assert_eq!(field.cursor(), 2);
        field.handle_key(&press(KeyCode::Home));
        field.handle_key(&press(KeyCode::Left));
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn text_ignores_modified_chars() {
        let mut field = TextField::new();
        let key = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(!field.handle_key(&key));
        assert!(field.is_empty());
    }

    #[test]
    fn text_wide_grapheme_cursor_column() {
        let mut field = TextField::new();
        field.set_value("日x");
        assert_eq!(field.cursor_column(), 3);
        field.handle_key(&press(KeyCode::Left));
        assert_eq!(field.cursor_column(), 2);
    }

    // -- SelectField --

    const TOPICS: &[&str] = &["", "Technology", "Health", "Education"];

    #[test]
    fn select_starts_on_placeholder() {
        let field = SelectField::new(TOPICS);
        assert_eq!(field.value(), "");
        assert_eq!(field.display(), "Select");
    }

    #[test]
    fn select_steps_and_clamps() {
        let mut field = SelectField::new(TOPICS);
        assert!(!field.handle_key(&press(KeyCode::Up)));
        assert!(field.handle_key(&press(KeyCode::Down)));
        assert_eq!(field.value(), "Technology");
        field.handle_key(&press(KeyCode::Down));
        field.handle_key(&press(KeyCode::Down));
        assert!(!field.handle_key(&press(KeyCode::Down)));
        assert_eq!(field.value(), "Education");
    }

    #[test]
    fn select_by_value() {
        let mut field = SelectField::new(TOPICS);
        assert!(field.select("Health"));
        assert_eq!(field.value(), "Health");
        assert!(!field.select("Health"));
        assert!(!field.select("nope"));
        assert_eq!(field.value(), "Health");
    }

    // -- CheckboxField --

    #[test]
    fn checkbox_toggles_on_space() {
        let mut field = CheckboxField::new();
        assert!(field.handle_key(&press(KeyCode::Char(' '))));
        assert!(field.checked());
        assert!(field.handle_key(&press(KeyCode::Char(' '))));
        assert!(!field.checked());
        assert!(!field.handle_key(&press(KeyCode::Enter)));
    }
}
