use std::{fs::OpenOptions, path::Path, sync::Arc};

use crate::{errors::Error, Result};

/// Initialize tracing for the tool.
///
/// Output goes to `log_file` rather than the terminal, which is owned by the
/// interactive menus. Can be overridden with `RUST_LOG`.
pub fn init(service_name: &str, log_file: &Path) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    // Default: info for our crates, warn for everything else.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,tss_core=info,tss_console=info,tss_grammers=info,{service_name}=info"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::External(format!("failed to init logging: {e}")))?;

    Ok(())
}
