use tss_core::{
    config::ConfigStore,
    errors::Error,
    paths::Paths,
    ports::{ActiveSession, NoticeKind},
    sessions::SessionRegistry,
    Result,
};

use crate::{handlers, presenter::TerminalConsole, text::Text};

/// Main menu entries, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    Login,
    ApiSettings,
    ProxySettings,
    ScrapeMembers,
    TransferMembers,
    ExportMessages,
    QuickTransfer,
    GeneralSettings,
    Exit,
}

impl MenuCommand {
    pub const ALL: [Self; 9] = [
        Self::Login,
        Self::ApiSettings,
        Self::ProxySettings,
        Self::ScrapeMembers,
        Self::TransferMembers,
        Self::ExportMessages,
        Self::QuickTransfer,
        Self::GeneralSettings,
        Self::Exit,
    ];

    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL.into_iter().find(|c| c.key() == choice)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Login => "1",
            Self::ApiSettings => "2",
            Self::ProxySettings => "3",
            Self::ScrapeMembers => "4",
            Self::TransferMembers => "5",
            Self::ExportMessages => "6",
            Self::QuickTransfer => "7",
            Self::GeneralSettings => "8",
            Self::Exit => "9",
        }
    }

    pub fn label(self) -> Text {
        match self {
            Self::Login => Text::MenuLogin,
            Self::ApiSettings => Text::MenuApi,
            Self::ProxySettings => Text::MenuProxy,
            Self::ScrapeMembers => Text::MenuScrape,
            Self::TransferMembers => Text::MenuTransfer,
            Self::ExportMessages => Text::MenuExport,
            Self::QuickTransfer => Text::MenuQuick,
            Self::GeneralSettings => Text::MenuSettings,
            Self::Exit => Text::MenuExit,
        }
    }

    /// Commands that talk to Telegram and therefore need a logged-in session.
    pub fn needs_session(self) -> bool {
        matches!(
            self,
            Self::ScrapeMembers | Self::TransferMembers | Self::ExportMessages | Self::QuickTransfer
        )
    }
}

pub struct AppState {
    pub paths: Paths,
    pub config: ConfigStore,
    pub sessions: SessionRegistry,
    pub console: TerminalConsole,
    pub session: Option<ActiveSession>,
}

impl AppState {
    pub fn new(paths: Paths, config: ConfigStore, console: TerminalConsole) -> Self {
        let sessions = SessionRegistry::new(paths.sessions_dir.clone());
        Self {
            paths,
            config,
            sessions,
            console,
            session: None,
        }
    }

    pub fn active(&self) -> Result<&ActiveSession> {
        self.session.as_ref().ok_or(Error::NotLoggedIn)
    }

    /// Persist and drop the active session, if any.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            let name = session.name.clone();
            if let Err(e) = session.close().await {
                tracing::warn!(session = %name, error = %e, "failed to close session");
            }
        }
    }
}

/// Show the main menu until the user exits or stdin closes.
pub async fn run_menu(state: &mut AppState) -> Result<()> {
    loop {
        state.console.header();

        let labels: Vec<(&str, &str)> = MenuCommand::ALL
            .iter()
            .map(|c| (c.key(), state.console.tr(c.label())))
            .collect();
        state
            .console
            .menu(state.console.tr(Text::MainMenuTitle), &labels);

        let choice = state.console.ask(Text::ChooseOption).await?;
        let Some(cmd) = MenuCommand::from_choice(&choice) else {
            state.console.say(NoticeKind::Error, Text::InvalidChoice);
            state.console.pause().await?;
            state.console.clear_screen();
            continue;
        };
        tracing::info!(command = ?cmd, "menu command");

        if cmd == MenuCommand::Exit {
            state.shutdown().await;
            state.console.say(NoticeKind::Info, Text::Goodbye);
            return Ok(());
        }

        if cmd.needs_session() && state.session.is_none() {
            state.console.say(NoticeKind::Error, Text::LoginRequired);
            state.console.pause().await?;
            state.console.clear_screen();
            continue;
        }

        dispatch(state, cmd).await?;
        state.console.pause().await?;
        state.console.clear_screen();
    }
}

async fn dispatch(state: &mut AppState, cmd: MenuCommand) -> Result<()> {
    match cmd {
        MenuCommand::Login => handlers::login::handle(state).await,
        MenuCommand::ApiSettings => handlers::settings::credentials(state).await,
        MenuCommand::ProxySettings => handlers::settings::proxy(state).await,
        MenuCommand::ScrapeMembers => handlers::members::scrape(state).await,
        MenuCommand::TransferMembers => handlers::transfer::transfer_members(state).await,
        MenuCommand::ExportMessages => handlers::messages::export(state).await,
        MenuCommand::QuickTransfer => handlers::transfer::quick_transfer(state).await,
        MenuCommand::GeneralSettings => handlers::settings::general(state).await,
        MenuCommand::Exit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_choices() {
        assert_eq!(MenuCommand::from_choice("1"), Some(MenuCommand::Login));
        assert_eq!(MenuCommand::from_choice(" 7 "), Some(MenuCommand::QuickTransfer));
        assert_eq!(MenuCommand::from_choice("9"), Some(MenuCommand::Exit));
        assert_eq!(MenuCommand::from_choice("0"), None);
        assert_eq!(MenuCommand::from_choice("10"), None);
        assert_eq!(MenuCommand::from_choice("login"), None);
    }

    #[test]
    fn keys_follow_display_order() {
        for (i, cmd) in MenuCommand::ALL.iter().enumerate() {
            assert_eq!(cmd.key(), (i + 1).to_string());
        }
    }

    #[test]
    fn only_telegram_commands_need_a_session() {
        let gated: Vec<_> = MenuCommand::ALL
            .into_iter()
            .filter(|c| c.needs_session())
            .collect();
        assert_eq!(
            gated,
            vec![
                MenuCommand::ScrapeMembers,
                MenuCommand::TransferMembers,
                MenuCommand::ExportMessages,
                MenuCommand::QuickTransfer,
            ]
        );
    }
}
