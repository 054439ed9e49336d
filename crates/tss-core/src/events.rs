use std::path::PathBuf;

use crate::ports::NoticeKind;

/// Progress and outcome notifications raised by the operations.
///
/// The console adapter renders them in the configured language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    ResolvingGroup,
    GroupInfo { title: String },
    SourceGroup { title: String },
    TargetGroup { title: String },

    ScrapeStarted,
    MembersCollected { matched: usize, seen: usize },
    MembersSaved { count: usize, path: PathBuf },
    NoMembersMatched,

    MessagesStarted,
    MessagesCollected { count: usize },
    MessagesSaved { count: usize, json: PathBuf, txt: PathBuf },
    NoMessages,

    MembersLoaded { count: usize, path: PathBuf },
    MembersFileMissing { path: PathBuf },
    NoMembersToTransfer,
    TransferCancelled,
    MemberTransferred { position: usize, total: usize, name: String },
    RateLimited { seconds: u64 },
    MemberFailed { name: String, error: String, precondition: bool },
    TransferComplete { transferred: usize, failed: usize, report: PathBuf },
}

impl Event {
    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::ResolvingGroup
            | Self::ScrapeStarted
            | Self::MembersCollected { .. }
            | Self::MessagesStarted
            | Self::MessagesCollected { .. } => NoticeKind::Progress,

            Self::GroupInfo { .. }
            | Self::SourceGroup { .. }
            | Self::TargetGroup { .. }
            | Self::MembersLoaded { .. }
            | Self::TransferCancelled => NoticeKind::Info,

            Self::MembersSaved { .. }
            | Self::MessagesSaved { .. }
            | Self::MemberTransferred { .. }
            | Self::TransferComplete { .. } => NoticeKind::Success,

            Self::NoMembersMatched
            | Self::NoMessages
            | Self::MembersFileMissing { .. }
            | Self::NoMembersToTransfer
            | Self::RateLimited { .. } => NoticeKind::Warning,

            Self::MemberFailed { precondition, .. } => {
                if *precondition {
                    NoticeKind::Warning
                } else {
                    NoticeKind::Error
                }
            }
        }
    }
}

/// Yes/no questions asked by the operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Question {
    ConfirmTransfer { count: usize },
}
