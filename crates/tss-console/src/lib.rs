//! Terminal adapter.
//!
//! This crate implements the `tss-core` Console port for an interactive
//! terminal and drives the main menu.

pub mod handlers;
pub mod presenter;
pub mod router;
pub mod rtl;
pub mod text;

pub use presenter::TerminalConsole;
pub use router::{run_menu, AppState, MenuCommand};
