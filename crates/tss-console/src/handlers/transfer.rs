use std::path::PathBuf;

use tss_core::{
    domain::MemberFilter,
    ports::{is_yes, NoticeKind},
    transfer::{self as core_transfer, MemberSource, TransferRequest},
    Result,
};

use crate::{
    handlers::{members::choose_filter, settle},
    router::AppState,
    text::Text,
};

/// Source, target and an optional members file from a previous scrape.
pub async fn transfer_members(state: &mut AppState) -> Result<()> {
    let Some((source, target)) = ask_groups(state).await? else {
        return Ok(());
    };

    let file = state.console.ask(Text::AskMembersFile).await?;
    let filter = if file.is_empty() {
        Some(choose_filter(state).await?)
    } else {
        None
    };

    run(state, build_request(source, target, &file, filter)).await
}

/// Source group members straight into the target, after one extra confirmation.
pub async fn quick_transfer(state: &mut AppState) -> Result<()> {
    state.console.say(NoticeKind::Info, Text::QuickTransferInfo);
    let Some((source, target)) = ask_groups(state).await? else {
        return Ok(());
    };

    let answer = state.console.ask(Text::AskContinue).await?;
    if !is_yes(&answer) {
        return Ok(());
    }

    let filter = choose_filter(state).await?;
    run(state, build_request(source, target, "", Some(filter))).await
}

/// A members file wins over a scrape; a scrape without a chosen filter takes everyone.
fn build_request(
    source: String,
    target: String,
    file: &str,
    filter: Option<MemberFilter>,
) -> TransferRequest {
    let file = file.trim();
    let members = if file.is_empty() {
        MemberSource::Scrape {
            filter: filter.unwrap_or_default(),
        }
    } else {
        MemberSource::File(PathBuf::from(file))
    };
    TransferRequest {
        source,
        target,
        members,
    }
}

async fn ask_groups(state: &AppState) -> Result<Option<(String, String)>> {
    let source = state.console.ask(Text::AskSource).await?;
    let target = state.console.ask(Text::AskTarget).await?;
    if source.is_empty() || target.is_empty() {
        state.console.say(NoticeKind::Error, Text::InvalidChoice);
        return Ok(None);
    }
    Ok(Some((source, target)))
}

async fn run(state: &AppState, req: TransferRequest) -> Result<()> {
    let settings = state.config.config().settings.clone();
    let result = async {
        let session = state.active()?;
        core_transfer::transfer(session, &state.console, &state.paths, &settings, req)
            .await
            .map(|outcome| tracing::info!(?outcome, "transfer finished"))
    }
    .await;
    settle(state, Text::TransferError, result)
}
