use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::Result;

/// On-disk layout of the working directory.
#[derive(Clone, Debug)]
pub struct Paths {
    pub config_file: PathBuf,
    pub sessions_dir: PathBuf,
    pub exports_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Paths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_file: root.join("config.toml"),
            sessions_dir: root.join("sessions"),
            exports_dir: root.join("exports"),
            logs_dir: root.join("logs"),
        }
    }

    /// Create the sessions/exports/logs directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.sessions_dir, &self.exports_dir, &self.logs_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn members_export(&self, group_id: i64, stamp: &str) -> PathBuf {
        self.exports_dir
            .join(format!("members_{group_id}_{stamp}.json"))
    }

    /// JSON and TXT paths of a message export.
    pub fn messages_export(&self, group_id: i64, stamp: &str) -> (PathBuf, PathBuf) {
        let base = format!("messages_{group_id}_{stamp}");
        (
            self.exports_dir.join(format!("{base}.json")),
            self.exports_dir.join(format!("{base}.txt")),
        )
    }

    pub fn transfer_report(&self, stamp: &str) -> PathBuf {
        self.logs_dir.join(format!("transfer_report_{stamp}.json"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join("tss.log")
    }
}
