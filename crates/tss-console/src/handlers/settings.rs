use tss_core::{
    config::{Credentials, Language, ProxyConfig, ProxyKind, SectionUpdate, Settings},
    ports::{is_yes, NoticeKind},
    Result,
};

use crate::{
    handlers::{parse_or, settle},
    router::AppState,
    text::Text,
};

/// API id / hash (and optional phone) used by the next login.
pub async fn credentials(state: &mut AppState) -> Result<()> {
    state.console.say(NoticeKind::Info, Text::CredentialsTitle);
    let current = state.config.config().credentials.clone();

    let shown_id = if current.api_id > 0 {
        current.api_id.to_string()
    } else {
        String::new()
    };
    let api_id_input = state.console.ask_or_keep(Text::AskApiId, &shown_id).await?;
    let api_id = match Credentials::parse_api_id(&api_id_input) {
        Ok(id) => id,
        Err(e) => return settle(state, Text::ConfigError, Err(e)),
    };
    let api_hash = state
        .console
        .ask_or_keep(Text::AskApiHash, &current.api_hash)
        .await?;
    let phone = state.console.ask_or_keep(Text::AskPhone, &current.phone).await?;

    let update = SectionUpdate::Credentials(Credentials {
        api_id,
        api_hash,
        phone,
    });
    let saved = state.config.save(update);
    if saved.is_ok() {
        state.console.say(NoticeKind::Success, Text::CredentialsSaved);
    }
    settle(state, Text::ConfigError, saved)
}

pub async fn proxy(state: &mut AppState) -> Result<()> {
    state.console.say(NoticeKind::Info, Text::ProxyTitle);
    let current = state.config.config().proxy.clone();

    let use_proxy = state.console.ask(Text::AskUseProxy).await?;
    if !is_yes(&use_proxy) {
        let saved = state.config.save(SectionUpdate::Proxy(ProxyConfig {
            enabled: false,
            ..current
        }));
        if saved.is_ok() {
            state.console.say(NoticeKind::Info, Text::ProxyDisabled);
        }
        return settle(state, Text::ConfigError, saved);
    }

    let kind_input = state
        .console
        .ask_or_keep(Text::AskProxyType, kind_name(current.kind))
        .await?;
    let Some(kind) = ProxyKind::parse(&kind_input) else {
        state.console.say(NoticeKind::Error, Text::InvalidProxy);
        return Ok(());
    };

    let host = state.console.ask_or_keep(Text::AskProxyHost, &current.host).await?;
    let port_input = state
        .console
        .ask_or_keep(Text::AskProxyPort, &current.port.to_string())
        .await?;
    let port = match port_input.trim().parse::<u16>() {
        Ok(p) if p > 0 && !host.trim().is_empty() => p,
        _ => {
            state.console.say(NoticeKind::Error, Text::InvalidProxy);
            return Ok(());
        }
    };
    let username = state.console.ask(Text::AskProxyUser).await?;
    let password = state.console.ask(Text::AskProxyPass).await?;

    let saved = state.config.save(SectionUpdate::Proxy(ProxyConfig {
        enabled: true,
        kind,
        host: host.trim().to_string(),
        port,
        username,
        password,
    }));
    if saved.is_ok() {
        state.console.say(NoticeKind::Success, Text::ProxySaved);
        if kind == ProxyKind::Http {
            state.console.say(NoticeKind::Warning, Text::HttpProxyUnsupported);
        }
    }
    settle(state, Text::ConfigError, saved)
}

/// Display language and pacing. The language switch applies immediately.
pub async fn general(state: &mut AppState) -> Result<()> {
    state.console.say(NoticeKind::Info, Text::SettingsTitle);
    let current = state.config.config().settings.clone();

    let lang_input = state
        .console
        .ask_or_keep(Text::AskLanguage, language_name(current.language))
        .await?;
    let Some(language) = parse_language(&lang_input) else {
        state.console.say(NoticeKind::Error, Text::InvalidChoice);
        return Ok(());
    };

    let delay_input = state
        .console
        .ask_or_keep(Text::AskDelay, &current.delay_between_requests.to_string())
        .await?;
    let max_input = state
        .console
        .ask_or_keep(Text::AskMaxMembers, &current.max_members_per_request.to_string())
        .await?;
    let (Some(delay), Some(max_members)) = (
        parse_or(&delay_input, current.delay_between_requests),
        parse_or(&max_input, current.max_members_per_request),
    ) else {
        state.console.say(NoticeKind::Error, Text::InvalidNumber);
        return Ok(());
    };

    let saved = state.config.save(SectionUpdate::Settings(Settings {
        language,
        delay_between_requests: delay,
        max_members_per_request: max_members,
    }));
    if saved.is_ok() {
        state.console.set_language(language);
        state.console.say(NoticeKind::Success, Text::SettingsSaved);
    }
    settle(state, Text::ConfigError, saved)
}

fn parse_language(input: &str) -> Option<Language> {
    match input.trim().to_lowercase().as_str() {
        "arabic" | "ar" | "العربية" => Some(Language::Arabic),
        "english" | "en" => Some(Language::English),
        _ => None,
    }
}

fn language_name(language: Language) -> &'static str {
    match language {
        Language::Arabic => "arabic",
        Language::English => "english",
    }
}

fn kind_name(kind: ProxyKind) -> &'static str {
    match kind {
        ProxyKind::Socks5 => "socks5",
        ProxyKind::Http => "http",
    }
}
