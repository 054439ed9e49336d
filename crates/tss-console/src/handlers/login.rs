use tss_core::{
    config::{ProxyConfig, ProxyKind},
    errors::Error,
    ports::{ActiveSession, Console, NoticeKind, TelegramGateway},
    sessions::{SessionChoice, SessionRegistry},
    Result,
};
use tss_grammers::{LoginParams, LoginPrompts};

use crate::{handlers::settle, router::AppState, text::Text};

pub async fn handle(state: &mut AppState) -> Result<()> {
    state.console.say(NoticeKind::Info, Text::LoginTitle);

    let credentials = state.config.config().credentials.clone();
    let Ok((api_id, api_hash)) = credentials.require() else {
        state.console.say(NoticeKind::Error, Text::ApiNotConfigured);
        return Ok(());
    };

    let name = choose_session(state).await?;
    let proxy_url = proxy_url(state, &state.config.config().proxy);

    // The old client writes its session file on close, so a re-login into
    // the same file must let it flush first. Any other session stays active
    // until the new login succeeds.
    let active = state.session.as_ref().map(|s| s.name.as_str());
    if reuses_active_file(active, &name) {
        state.shutdown().await;
    }

    let params = LoginParams {
        api_id,
        api_hash,
        phone: credentials.phone.clone(),
        session_path: state.sessions.session_path(&name),
        proxy_url,
    };
    let prompts = LoginPrompts {
        phone: state.console.tr(Text::AskPhone),
        code: state.console.tr(Text::AskCode),
        password: state.console.tr(Text::AskPassword),
    };

    let result = async {
        let gateway = tss_grammers::login(params, &state.console, prompts).await?;
        let account = gateway.me().await?;
        Ok::<_, Error>((gateway, account))
    }
    .await;

    match result {
        Ok((gateway, account)) => {
            let who = match &account.username {
                Some(username) => format!("{} (@{username})", account.first_name),
                None => account.first_name.clone(),
            };
            state.console.notify(
                NoticeKind::Success,
                &format!("{} {who}", state.console.tr(Text::LoggedInAs)),
            );
            tracing::info!(session = %name, account_id = account.id, "logged in");
            state.shutdown().await;
            state.session = Some(ActiveSession::new(name, account, Box::new(gateway)));
            Ok(())
        }
        Err(e) => settle(state, Text::LoginFailed, Err(e)),
    }
}

async fn choose_session(state: &AppState) -> Result<String> {
    let names = state.sessions.list_sessions()?;
    if !names.is_empty() {
        state.console.say(NoticeKind::Info, Text::AvailableSessions);
        for line in session_lines(&names) {
            state.console.notify(NoticeKind::Info, &line);
        }
        let choice = state.console.ask(Text::ChooseSession).await?;
        if let SessionChoice::Existing(name) = SessionRegistry::select_or_create(&choice, &names) {
            return Ok(name);
        }
    }
    state.console.ask(Text::NewSessionName).await
}

fn reuses_active_file(active: Option<&str>, chosen: &str) -> bool {
    active == Some(chosen)
}

fn session_lines(names: &[String]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect()
}

/// The proxy URL to hand to the client, if one is usable.
fn proxy_url(state: &AppState, proxy: &ProxyConfig) -> Option<String> {
    if !proxy.enabled {
        return None;
    }
    if proxy.kind == ProxyKind::Http {
        state.console.say(NoticeKind::Warning, Text::HttpProxyUnsupported);
        return None;
    }
    match proxy.to_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring proxy settings");
            state.console.say(NoticeKind::Warning, Text::InvalidProxy);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_numbered_from_one() {
        let names = vec!["work".to_string(), "عمل".to_string()];
        assert_eq!(session_lines(&names), ["1. work", "2. عمل"]);
        assert!(session_lines(&[]).is_empty());
    }

    #[test]
    fn only_the_same_session_is_closed_before_login() {
        assert!(reuses_active_file(Some("work"), "work"));
        assert!(!reuses_active_file(Some("work"), "home"));
        assert!(!reuses_active_file(None, "work"));
    }
}
