use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;

/// Kind of a resolved Telegram group. Basic groups and channels are invited
/// into through different API calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Basic,
    Megagroup,
    Broadcast,
}

/// Opaque handle for a resolved group. Only the gateway interprets
/// `access_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupHandle {
    pub id: i64,
    pub title: String,
    pub kind: GroupKind,
    pub access_hash: Option<i64>,
}

/// A parsed user-supplied group reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupRef {
    Username(String),
    Invite(String),
    Id(i64),
}

/// Bot API style ids for channels are `-100<id>`.
const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

fn invite_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:t\.me|telegram\.me|telegram\.dog)/(?:joinchat/|\+)([A-Za-z0-9_-]+)/?$")
            .expect("valid regex")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:t\.me|telegram\.me|telegram\.dog)/(?:s/)?([A-Za-z][A-Za-z0-9_]{3,31})(?:/\d+)?/?$")
            .expect("valid regex")
    })
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@?([A-Za-z][A-Za-z0-9_]{3,31})$").expect("valid regex"))
}

impl GroupRef {
    /// Classify an invite link, `t.me` link, `@username` or numeric id.
    pub fn parse(input: &str) -> std::result::Result<Self, GatewayError> {
        let raw = input.trim();
        let stripped = raw
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        if let Some(c) = invite_re().captures(stripped) {
            return Ok(Self::Invite(c[1].to_string()));
        }
        if let Some(c) = link_re().captures(stripped) {
            return Ok(Self::Username(c[1].to_string()));
        }
        if let Ok(id) = stripped.parse::<i64>() {
            return normalize_chat_id(id)
                .map(Self::Id)
                .ok_or_else(|| GatewayError::GroupNotFound(raw.to_string()));
        }
        if let Some(c) = username_re().captures(stripped) {
            return Ok(Self::Username(c[1].to_string()));
        }

        Err(GatewayError::GroupNotFound(raw.to_string()))
    }
}

/// Strip the Bot API sign/prefix from a chat id (`-100123` -> `123`, `-45` -> `45`).
///
/// `None` for ids with no positive counterpart (`i64::MIN`).
pub fn normalize_chat_id(id: i64) -> Option<i64> {
    let abs = id.checked_abs()?;
    if id <= -CHANNEL_ID_OFFSET {
        Some(abs - CHANNEL_ID_OFFSET)
    } else {
        Some(abs)
    }
}

/// The four mutually exclusive participant filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemberFilter {
    #[default]
    All,
    AdminsOnly,
    Active,
    WithUsername,
}

impl MemberFilter {
    /// Menu choice `1..=4`; anything else keeps every member.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => Self::AdminsOnly,
            "3" => Self::Active,
            "4" => Self::WithUsername,
            _ => Self::All,
        }
    }

    pub fn matches(&self, p: &Participant) -> bool {
        match self {
            Self::All => true,
            Self::AdminsOnly => p.is_admin,
            Self::Active => p.has_status,
            Self::WithUsername => p.username.as_deref().is_some_and(|u| !u.is_empty()),
        }
    }
}

/// Participant as produced by the gateway, before filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Participant {
    pub id: i64,
    pub access_hash: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub is_bot: bool,
    pub is_admin: bool,
    /// A last-seen status or online flag is present.
    pub has_status: bool,
}

/// Exported member. Written once, optionally reloaded for a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: i64,
    pub access_hash: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub scraped_at: String,
}

impl MemberRecord {
    pub fn from_participant(p: Participant, scraped_at: &str) -> Self {
        Self {
            id: p.id,
            access_hash: p.access_hash,
            first_name: p.first_name.unwrap_or_default(),
            last_name: p.last_name.unwrap_or_default(),
            username: p.username.unwrap_or_default(),
            phone: p.phone.unwrap_or_default(),
            is_bot: p.is_bot,
            is_admin: p.is_admin,
            scraped_at: scraped_at.to_string(),
        }
    }

    /// `"first last"`, or `User_<id>` when both names are empty.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            format!("User_{}", self.id)
        } else {
            name.to_string()
        }
    }
}

/// Message as produced by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageInfo {
    pub id: i32,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub sender_id: Option<i64>,
    pub text: String,
    pub has_media: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i32,
    pub date: Option<String>,
    pub sender_id: Option<i64>,
    pub text: String,
    pub has_media: bool,
    pub group_id: i64,
    pub group_name: String,
}

impl MessageRecord {
    pub fn from_info(m: MessageInfo, group: &GroupHandle) -> Self {
        Self {
            id: m.id,
            date: m.date.map(|d| d.to_rfc3339()),
            sender_id: m.sender_id,
            text: m.text,
            has_media: m.has_media,
            group_id: group.id,
            group_name: group.title.clone(),
        }
    }
}

/// The logged-in account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTransfer {
    pub member: MemberRecord,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    pub source_group: String,
    pub target_group: String,
    pub total_members: usize,
    pub transferred: usize,
    pub failed: usize,
    pub failed_details: Vec<FailedTransfer>,
    pub transfer_date: String,
}
