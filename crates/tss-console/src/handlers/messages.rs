use tss_core::{ports::NoticeKind, scraper, Result};

use crate::{
    handlers::{parse_or, settle},
    router::AppState,
    text::Text,
};

pub async fn export(state: &mut AppState) -> Result<()> {
    let reference = state.console.ask(Text::AskGroupLink).await?;
    if reference.is_empty() {
        state.console.say(NoticeKind::Error, Text::InvalidChoice);
        return Ok(());
    }

    let limit_input = state.console.ask(Text::AskMessageLimit).await?;
    let limit = match parse_or(&limit_input, scraper::DEFAULT_MESSAGE_LIMIT) {
        Some(n) if n > 0 => n,
        _ => {
            state.console.say(NoticeKind::Error, Text::InvalidNumber);
            return Ok(());
        }
    };

    let state = &*state;
    let language = state.config.config().settings.language;
    let result = async {
        let session = state.active()?;
        scraper::export_messages(
            session,
            &state.console,
            &state.paths,
            &reference,
            limit,
            language,
        )
        .await
        .map(|_| ())
    }
    .await;
    settle(state, Text::ExportError, result)
}
