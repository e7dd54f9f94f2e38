#![forbid(unsafe_code)]

//! The three form screens.
//!
//! Each screen owns its field widgets, its error record, and a focus
//! position over the currently visible fields. Key handling returns a
//! [`FormEffect`] so the screens stay free of runtime and I/O concerns;
//! the application model turns effects into commands.
//!
//! Shared layout: label column, value cell (reverse video when focused),
//! error line in red under the field that failed.

pub mod event;
pub mod job;
pub mod survey;

use formdeck_runtime::{Color, RequestToken, Style, Surface};

use crate::fields::{CheckboxField, SelectField, TextField};

/// What a form wants the application to do after a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    /// Nothing beyond the state change already applied.
    None,
    /// Validation passed; show the notification with this body.
    Submit(String),
    /// The survey topic changed; fetch questions for it.
    FetchQuestions {
        /// The newly selected topic.
        topic: &'static str,
        /// Generation stamp for the request.
        token: RequestToken,
    },
}

// ---------------------------------------------------------------------------
// Row drawing
// ---------------------------------------------------------------------------

/// Column where values start; labels are right-padded up to it.
pub(crate) const VALUE_COL: u16 = 28;

pub(crate) fn label_style(focused: bool) -> Style {
    if focused {
        Style::new().bold()
    } else {
        Style::new()
    }
}

pub(crate) fn value_style(focused: bool) -> Style {
    if focused {
        Style::new().reverse()
    } else {
        Style::new().fg(Color::Cyan)
    }
}

pub(crate) fn error_style() -> Style {
    Style::new().fg(Color::Red)
}

/// Draw the focus marker and label; the value starts at [`VALUE_COL`] or
/// two columns past a long label, whichever is further right.
fn draw_label(surface: &mut Surface, y: u16, label: &str, focused: bool) -> u16 {
    let marker = if focused { "> " } else { "  " };
    surface.set_str(0, y, marker, label_style(focused));
    let end = surface.set_str(2, y, label, label_style(focused));
    (end + 2).max(VALUE_COL)
}

fn draw_error(surface: &mut Surface, y: u16, error: Option<&str>) -> u16 {
    match error {
        Some(message) => {
            surface.set_str(VALUE_COL, y, message, error_style());
            y + 1
        }
        None => y,
    }
}

/// Draw a text input row. Returns the next free row.
pub(crate) fn draw_text_row(
    surface: &mut Surface,
    y: u16,
    label: &str,
    field: &TextField,
    focused: bool,
    error: Option<&str>,
) -> u16 {
    let value_x = draw_label(surface, y, label, focused);
    let end = surface.set_str(value_x, y, field.value(), value_style(focused));
    if focused {
        // Block cursor one past the text when at the end.
        let cursor_x = value_x + field.cursor_column() as u16;
        if cursor_x >= end {
            surface.set_str(cursor_x, y, " ", Style::new().reverse());
        }
    }
    draw_error(surface, y + 1, error)
}

/// Draw a select row. Returns the next free row.
pub(crate) fn draw_select_row(
    surface: &mut Surface,
    y: u16,
    label: &str,
    field: &SelectField,
    focused: bool,
    error: Option<&str>,
) -> u16 {
    let value_x = draw_label(surface, y, label, focused);
    let text = format!("< {} >", field.display());
    surface.set_str(value_x, y, &text, value_style(focused));
    draw_error(surface, y + 1, error)
}

/// Draw a checkbox row. Returns the next free row.
pub(crate) fn draw_checkbox_row(
    surface: &mut Surface,
    y: u16,
    label: &str,
    field: &CheckboxField,
    focused: bool,
    error: Option<&str>,
) -> u16 {
    let value_x = draw_label(surface, y, label, focused);
    let text = if field.checked() { "[x]" } else { "[ ]" };
    surface.set_str(value_x, y, text, value_style(focused));
    draw_error(surface, y + 1, error)
}

/// Move a focus index forward or back over `len` positions, wrapping.
pub(crate) fn cycle_focus(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}
