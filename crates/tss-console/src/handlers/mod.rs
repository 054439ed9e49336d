//! Menu command handlers.
//!
//! Each handler collects its inputs through the console, calls into
//! `tss-core`, and renders failures. Only a closed stdin is returned to the
//! menu loop as an error.

use std::io;

use tss_core::{
    errors::Error,
    ports::{Console, NoticeKind},
    Result,
};

use crate::{
    router::AppState,
    text::{render_error, Text},
};

pub mod login;
pub mod members;
pub mod messages;
pub mod settings;
pub mod transfer;

/// Render an operation failure under `context`, or hand back input errors.
pub(crate) fn settle(state: &AppState, context: Text, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if input_closed(&e) => Err(e),
        Err(e) => {
            tracing::warn!(context = ?context, error = %e, "operation failed");
            let text = render_error(state.console.language(), context, &e);
            state.console.notify(NoticeKind::Error, &text);
            Ok(())
        }
    }
}

pub fn input_closed(e: &Error) -> bool {
    matches!(e, Error::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof)
}

/// Empty input means `default`; anything else must parse.
pub(crate) fn parse_or<T: std::str::FromStr>(input: &str, default: T) -> Option<T> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    input.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_takes_the_default() {
        assert_eq!(parse_or::<usize>("", 1000), Some(1000));
        assert_eq!(parse_or::<usize>(" 25 ", 1000), Some(25));
        assert_eq!(parse_or::<usize>("many", 1000), None);
        assert_eq!(parse_or::<usize>("-3", 0), None);
    }

    #[test]
    fn only_eof_counts_as_closed_input() {
        let eof = Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        assert!(input_closed(&eof));
        assert!(!input_closed(&Error::NotLoggedIn));
        let denied = Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "x"));
        assert!(!input_closed(&denied));
    }
}
