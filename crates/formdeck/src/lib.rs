#![forbid(unsafe_code)]

//! Terminal data-entry forms: event registration, job application, and a
//! survey with fetched follow-up questions.
//!
//! Module map:
//! - [`fields`]: the text/select/checkbox widgets the forms are built from.
//! - [`forms`]: the three form screens and their shared drawing helpers.
//! - [`questions`]: the survey's additional-question source seam.
//! - [`submit`]: submission records and notification bodies.
//! - [`app`]: the top-level model (tabs, modal, message routing).
//! - [`cli`]: argument parsing for the binary.

pub mod app;
pub mod cli;
pub mod fields;
pub mod forms;
pub mod questions;
pub mod submit;
