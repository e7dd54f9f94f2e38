#![forbid(unsafe_code)]

//! Terminal runtime for formdeck.
//!
//! A small Elm-style runtime: a [`Model`](program::Model) maps messages to
//! state transitions and draws into a [`Surface`](surface::Surface); the
//! [`Program`](program::Program) owns the terminal, the input thread, and
//! background task threads. [`token`] provides the request generation
//! counter used to ignore stale background results.

pub mod event;
pub mod program;
pub mod surface;
pub mod token;

pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use program::{Cmd, Model, Program, ProgramError};
pub use surface::{Color, Style, Surface};
pub use token::{RequestToken, TokenSource};
