use std::{fmt::Write as _, fs, ops::ControlFlow, path::Path};

use crate::{
    config::Language,
    domain::{GroupHandle, MemberFilter, MemberRecord, MessageInfo, MessageRecord, Participant},
    events::Event,
    paths::Paths,
    ports::{ActiveSession, Console, TelegramGateway},
    utils::{file_stamp, iso_timestamp_local, truncate_chars, write_json_pretty},
    Result,
};

pub const MEMBER_PROGRESS_EVERY: usize = 50;
pub const MESSAGE_PROGRESS_EVERY: usize = 100;
pub const DEFAULT_MESSAGE_LIMIT: usize = 1000;
const TXT_TEXT_MAX_CHARS: usize = 200;

/// Resolve `reference`, collect matching members and export them as JSON.
///
/// `limit == 0` collects every match. An empty result writes nothing and is
/// reported as a warning.
pub async fn scrape_members(
    session: &ActiveSession,
    console: &dyn Console,
    paths: &Paths,
    reference: &str,
    filter: MemberFilter,
    limit: usize,
) -> Result<Vec<MemberRecord>> {
    console.report(Event::ResolvingGroup);
    let group = session.gateway().resolve_group(reference).await?;
    console.report(Event::GroupInfo {
        title: group.title.clone(),
    });

    scrape_resolved(session.gateway(), console, paths, &group, filter, limit).await
}

/// Member scrape against an already resolved group (shared with transfers).
pub(crate) async fn scrape_resolved(
    gateway: &dyn TelegramGateway,
    console: &dyn Console,
    paths: &Paths,
    group: &GroupHandle,
    filter: MemberFilter,
    limit: usize,
) -> Result<Vec<MemberRecord>> {
    console.report(Event::ScrapeStarted);
    let members = collect_members(gateway, console, group, filter, limit).await?;

    if members.is_empty() {
        console.report(Event::NoMembersMatched);
        return Ok(members);
    }

    let path = paths.members_export(group.id, &file_stamp());
    write_json_pretty(&path, &members)?;
    tracing::info!(
        group_id = group.id,
        count = members.len(),
        path = %path.display(),
        "members exported"
    );
    console.report(Event::MembersSaved {
        count: members.len(),
        path,
    });
    Ok(members)
}

async fn collect_members(
    gateway: &dyn TelegramGateway,
    console: &dyn Console,
    group: &GroupHandle,
    filter: MemberFilter,
    limit: usize,
) -> Result<Vec<MemberRecord>> {
    let mut members: Vec<MemberRecord> = Vec::new();
    let mut seen = 0usize;

    let mut on_participant = |p: Participant| {
        seen += 1;
        if !filter.matches(&p) {
            return ControlFlow::Continue(());
        }

        members.push(MemberRecord::from_participant(p, &iso_timestamp_local()));
        if members.len() % MEMBER_PROGRESS_EVERY == 0 {
            console.report(Event::MembersCollected {
                matched: members.len(),
                seen,
            });
        }

        if limit > 0 && members.len() >= limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    };
    gateway
        .for_each_participant(group, &mut on_participant)
        .await?;

    tracing::info!(
        group_id = group.id,
        seen,
        matched = members.len(),
        ?filter,
        "participant scan finished"
    );
    Ok(members)
}

/// Read a member export back, preserving order and every field.
pub fn load_members(path: &Path) -> Result<Vec<MemberRecord>> {
    let text = fs::read_to_string(path)?;
    let members = serde_json::from_str::<Vec<MemberRecord>>(&text)?;
    Ok(members)
}

/// Export up to `limit` most recent messages as JSON plus a readable TXT file.
///
/// Returns the exported records; empty history is a warning, not an error.
pub async fn export_messages(
    session: &ActiveSession,
    console: &dyn Console,
    paths: &Paths,
    reference: &str,
    limit: usize,
    language: Language,
) -> Result<Vec<MessageRecord>> {
    console.report(Event::ResolvingGroup);
    let gateway = session.gateway();
    let group = gateway.resolve_group(reference).await?;
    console.report(Event::GroupInfo {
        title: group.title.clone(),
    });

    console.report(Event::MessagesStarted);
    let mut messages: Vec<MessageRecord> = Vec::new();
    let mut on_message = |m: MessageInfo| {
        messages.push(MessageRecord::from_info(m, &group));
        if messages.len() % MESSAGE_PROGRESS_EVERY == 0 {
            console.report(Event::MessagesCollected {
                count: messages.len(),
            });
        }
        ControlFlow::Continue(())
    };
    gateway
        .for_each_message(&group, limit, &mut on_message)
        .await?;

    if messages.is_empty() {
        console.report(Event::NoMessages);
        return Ok(messages);
    }

    let (json_path, txt_path) = paths.messages_export(group.id, &file_stamp());
    write_json_pretty(&json_path, &messages)?;
    fs::write(
        &txt_path,
        render_transcript(&group.title, &messages, language),
    )?;

    tracing::info!(
        group_id = group.id,
        count = messages.len(),
        json = %json_path.display(),
        "messages exported"
    );
    console.report(Event::MessagesSaved {
        count: messages.len(),
        json: json_path,
        txt: txt_path,
    });
    Ok(messages)
}

/// Human-readable rendering; message text is cut at 200 characters here only.
pub fn render_transcript(title: &str, messages: &[MessageRecord], language: Language) -> String {
    let (group_label, count_label) = match language {
        Language::Arabic => ("رسائل مجموعة", "عدد الرسائل"),
        Language::English => ("Messages of group", "Message count"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{group_label}: {title}");
    let _ = writeln!(out, "{count_label}: {}", messages.len());
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for msg in messages {
        let date = msg.date.as_deref().unwrap_or("None");
        let sender = msg
            .sender_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "None".to_string());
        let _ = writeln!(out, "[{date}] User_{sender}:");
        let _ = writeln!(out, "{}", truncate_chars(&msg.text, TXT_TEXT_MAX_CHARS));
        out.push_str(&"-".repeat(40));
        out.push('\n');
    }
    out
}
