use anyhow::Context as _;
use tss_console::{
    handlers::input_closed, rtl::Reshaper, run_menu, text::Text, AppState, TerminalConsole,
};
use tss_core::{
    config::ConfigStore,
    paths::Paths,
    ports::{Console, NoticeKind},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let root = std::env::current_dir().context("cannot read the working directory")?;
    let paths = Paths::new(root);
    paths
        .ensure_dirs()
        .context("cannot create sessions/exports/logs directories")?;
    tss_core::logging::init("tss", &paths.log_file()).context("cannot open the log file")?;

    // Not TOML at all: run on defaults, the file is backed up on the next save.
    let (config, load_error) = match ConfigStore::load(&paths.config_file) {
        Ok(config) => (config, None),
        Err(e) => (ConfigStore::with_defaults(&paths.config_file), Some(e)),
    };

    let language = config.config().settings.language;
    let reshaper = Reshaper::detect();
    tracing::info!(?language, rtl_shaping = reshaper.is_available(), "starting");

    let console = TerminalConsole::new(language, reshaper);
    if language.is_rtl() && !reshaper.is_available() {
        console.say(NoticeKind::Info, Text::RtlUnavailable);
    }
    if let Some(e) = load_error {
        tracing::error!(path = %paths.config_file.display(), error = %e, "config load failed");
        console.notify(
            NoticeKind::Warning,
            &format!("{}: {e}", console.tr(Text::ConfigLoadFailed)),
        );
    }
    for section in config.invalid_sections() {
        tracing::warn!(section = section.name, reason = %section.reason, "config section reset");
        console.notify(
            NoticeKind::Warning,
            &format!(
                "{} [{}]: {}",
                console.tr(Text::ConfigSectionInvalid),
                section.name,
                section.reason
            ),
        );
    }

    let mut state = AppState::new(paths, config, console);
    let finished = tokio::select! {
        r = run_menu(&mut state) => Some(r),
        _ = tokio::signal::ctrl_c() => None,
    };

    state.shutdown().await;
    match finished {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) if input_closed(&e) => {
            tracing::info!("stdin closed");
            Ok(())
        }
        Some(Err(e)) => {
            tracing::error!(error = %e, "unhandled error");
            state.console.notify(
                NoticeKind::Error,
                &format!("{}: {e}", state.console.tr(Text::UnexpectedError)),
            );
            std::process::exit(1);
        }
        None => {
            println!();
            state.console.say(NoticeKind::Warning, Text::Interrupted);
            tracing::info!("interrupted");
            Ok(())
        }
    }
}
