use std::{fs, path::PathBuf};

use crate::Result;

pub const SESSION_EXTENSION: &str = "session";
const DEFAULT_SESSION: &str = "default";

/// Outcome of picking from the listed sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionChoice {
    Existing(String),
    /// Caller should prompt for a fresh name.
    New,
}

/// Locally persisted sessions, one `<name>.session` file each.
#[derive(Clone, Debug)]
pub struct SessionRegistry {
    dir: PathBuf,
}

impl SessionRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Session names found in the directory (re-scanned on every call).
    pub fn list_sessions(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for ent in fs::read_dir(&self.dir)?.flatten() {
            let path = ent.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(SESSION_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve a 1-based menu index against `names`. `0`, out-of-range or
    /// non-numeric input means a new session.
    pub fn select_or_create(choice: &str, names: &[String]) -> SessionChoice {
        match choice.trim().parse::<usize>() {
            Ok(idx) if idx >= 1 && idx <= names.len() => {
                SessionChoice::Existing(names[idx - 1].clone())
            }
            _ => SessionChoice::New,
        }
    }

    /// Path of the session file for `name`. Reusing a name reopens that session.
    pub fn session_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{SESSION_EXTENSION}", sanitize_name(name)))
    }
}

/// Reduce a user-entered name to a single safe path component.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '+' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        DEFAULT_SESSION.to_string()
    } else {
        cleaned
    }
}
