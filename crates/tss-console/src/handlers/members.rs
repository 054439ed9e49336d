use tss_core::{domain::MemberFilter, ports::NoticeKind, scraper, Result};

use crate::{
    handlers::{parse_or, settle},
    router::AppState,
    text::Text,
};

pub async fn scrape(state: &mut AppState) -> Result<()> {
    let reference = state.console.ask(Text::AskGroupLink).await?;
    if reference.is_empty() {
        state.console.say(NoticeKind::Error, Text::InvalidChoice);
        return Ok(());
    }

    let filter = choose_filter(state).await?;
    let limit_input = state.console.ask(Text::AskMemberLimit).await?;
    let Some(limit) = parse_or(&limit_input, 0usize) else {
        state.console.say(NoticeKind::Error, Text::InvalidNumber);
        return Ok(());
    };

    let state = &*state;
    let result = async {
        let session = state.active()?;
        scraper::scrape_members(
            session,
            &state.console,
            &state.paths,
            &reference,
            filter,
            limit,
        )
        .await
        .map(|_| ())
    }
    .await;
    settle(state, Text::ScrapeError, result)
}

pub(crate) async fn choose_filter(state: &AppState) -> Result<MemberFilter> {
    let c = &state.console;
    c.menu(
        c.tr(Text::FilterTitle),
        &[
            ("1", c.tr(Text::FilterAll)),
            ("2", c.tr(Text::FilterAdmins)),
            ("3", c.tr(Text::FilterActive)),
            ("4", c.tr(Text::FilterUsername)),
        ],
    );
    let choice = c.ask(Text::ChooseFilter).await?;
    Ok(MemberFilter::from_choice(&choice))
}
