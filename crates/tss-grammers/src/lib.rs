//! Telegram gateway adapter (grammers).
//!
//! This crate implements the `tss-core` TelegramGateway port over a user
//! account MTProto client.

use std::{ops::ControlFlow, path::PathBuf};

use async_trait::async_trait;

use grammers_client::{
    types::{Chat, Role},
    Client, InvocationError,
};
use grammers_session::{PackedChat, PackedType};
use grammers_tl_types as tl;

use tss_core::{
    domain::{Account, GroupHandle, GroupKind, GroupRef, MessageInfo, Participant},
    errors::GatewayError,
    ports::TelegramGateway,
};

mod login;

pub use login::{login, LoginParams, LoginPrompts};

#[derive(Clone)]
pub struct GrammersGateway {
    client: Client,
    session_path: PathBuf,
}

impl GrammersGateway {
    pub(crate) fn new(client: Client, session_path: PathBuf) -> Self {
        Self {
            client,
            session_path,
        }
    }

    fn save_session(&self) -> std::result::Result<(), GatewayError> {
        self.client
            .session()
            .save_to_file(&self.session_path)
            .map_err(|e| GatewayError::Other(format!("cannot save session: {e}")))
    }

    async fn resolve_invite(&self, hash: &str) -> std::result::Result<GroupHandle, GatewayError> {
        let invite = self
            .client
            .invoke(&tl::functions::messages::CheckChatInvite {
                hash: hash.to_string(),
            })
            .await
            .map_err(map_invocation)?;

        match invite {
            tl::enums::ChatInvite::Already(tl::types::ChatInviteAlready { chat })
            | tl::enums::ChatInvite::Peek(tl::types::ChatInvitePeek { chat, .. }) => {
                handle_from_raw(&chat).ok_or_else(|| GatewayError::GroupNotFound(hash.to_string()))
            }
            tl::enums::ChatInvite::Invite(_) => Err(GatewayError::GroupNotFound(format!(
                "{hash}: join the group with this account first"
            ))),
        }
    }

    async fn resolve_by_id(&self, id: i64) -> std::result::Result<GroupHandle, GatewayError> {
        // Bare ids carry no access hash; find the group among our own dialogs.
        let mut dialogs = self.client.iter_dialogs();
        while let Some(dialog) = dialogs.next().await.map_err(map_invocation)? {
            let chat = dialog.chat();
            if chat.id() == id {
                return handle_from_chat(chat)
                    .ok_or_else(|| GatewayError::GroupNotFound(id.to_string()));
            }
        }
        Err(GatewayError::GroupNotFound(id.to_string()))
    }
}

#[async_trait]
impl TelegramGateway for GrammersGateway {
    async fn me(&self) -> std::result::Result<Account, GatewayError> {
        let me = self.client.get_me().await.map_err(map_invocation)?;
        Ok(Account {
            id: me.id(),
            first_name: me.first_name().to_string(),
            username: me.username().map(str::to_string),
        })
    }

    async fn resolve_group(&self, reference: &str) -> std::result::Result<GroupHandle, GatewayError> {
        let handle = match GroupRef::parse(reference)? {
            GroupRef::Invite(hash) => self.resolve_invite(&hash).await?,
            GroupRef::Id(id) => self.resolve_by_id(id).await?,
            GroupRef::Username(name) => {
                let chat = self
                    .client
                    .resolve_username(&name)
                    .await
                    .map_err(map_invocation)?
                    .ok_or_else(|| GatewayError::GroupNotFound(reference.to_string()))?;
                handle_from_chat(&chat)
                    .ok_or_else(|| GatewayError::GroupNotFound(reference.to_string()))?
            }
        };
        tracing::debug!(reference, group_id = handle.id, kind = ?handle.kind, "group resolved");
        Ok(handle)
    }

    async fn for_each_participant(
        &self,
        group: &GroupHandle,
        on_participant: &mut (dyn FnMut(Participant) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        let mut iter = self.client.iter_participants(packed(group));
        while let Some(p) = iter.next().await.map_err(map_invocation)? {
            let user = &p.user;
            let has_status = matches!(
                &user.raw.status,
                Some(status) if !matches!(status, tl::enums::UserStatus::Empty)
            );
            let participant = Participant {
                id: user.id(),
                access_hash: user.pack().access_hash,
                first_name: non_empty(Some(user.first_name())),
                last_name: non_empty(user.last_name()),
                username: non_empty(user.username()),
                phone: non_empty(user.phone()),
                is_bot: user.is_bot(),
                is_admin: matches!(p.role, Role::Creator { .. } | Role::Admin { .. }),
                has_status,
            };
            if on_participant(participant).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn for_each_message(
        &self,
        group: &GroupHandle,
        limit: usize,
        on_message: &mut (dyn FnMut(MessageInfo) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        let mut iter = self.client.iter_messages(packed(group)).limit(limit);
        let mut produced = 0usize;
        while let Some(m) = iter.next().await.map_err(map_invocation)? {
            produced += 1;
            let info = MessageInfo {
                id: m.id(),
                date: Some(m.date()),
                sender_id: m.sender().map(|s| s.id()),
                text: m.text().to_string(),
                has_media: m.media().is_some(),
            };
            if on_message(info).is_break() || produced >= limit {
                break;
            }
        }
        Ok(())
    }

    async fn invite(
        &self,
        target: &GroupHandle,
        user_id: i64,
        access_hash: i64,
    ) -> std::result::Result<(), GatewayError> {
        let user = tl::enums::InputUser::User(tl::types::InputUser {
            user_id,
            access_hash,
        });

        let invited = match target.kind {
            GroupKind::Basic => self
                .client
                .invoke(&tl::functions::messages::AddChatUser {
                    chat_id: target.id,
                    user_id: user,
                    fwd_limit: 0,
                })
                .await
                .map_err(map_invocation)?,
            GroupKind::Megagroup | GroupKind::Broadcast => {
                let channel = tl::enums::InputChannel::Channel(tl::types::InputChannel {
                    channel_id: target.id,
                    access_hash: target.access_hash.unwrap_or(0),
                });
                self.client
                    .invoke(&tl::functions::channels::InviteToChannel {
                        channel,
                        users: vec![user],
                    })
                    .await
                    .map_err(map_invocation)?
            }
        };
        check_invited(invited, user_id)
    }

    async fn disconnect(&self) -> std::result::Result<(), GatewayError> {
        self.save_session()?;
        tracing::info!(path = %self.session_path.display(), "session saved");
        Ok(())
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.is_empty()).map(str::to_string)
}

fn packed(group: &GroupHandle) -> PackedChat {
    let ty = match group.kind {
        GroupKind::Basic => PackedType::Chat,
        GroupKind::Megagroup => PackedType::Megagroup,
        GroupKind::Broadcast => PackedType::Broadcast,
    };
    PackedChat {
        ty,
        id: group.id,
        access_hash: group.access_hash,
    }
}

fn handle_from_chat(chat: &Chat) -> Option<GroupHandle> {
    let packed = chat.pack();
    let kind = match packed.ty {
        PackedType::Chat => GroupKind::Basic,
        PackedType::Megagroup | PackedType::Gigagroup => GroupKind::Megagroup,
        PackedType::Broadcast => GroupKind::Broadcast,
        PackedType::User | PackedType::Bot => return None,
    };
    Some(GroupHandle {
        id: packed.id,
        title: chat.name().to_string(),
        kind,
        access_hash: packed.access_hash,
    })
}

fn handle_from_raw(chat: &tl::enums::Chat) -> Option<GroupHandle> {
    match chat {
        tl::enums::Chat::Chat(c) => Some(GroupHandle {
            id: c.id,
            title: c.title.clone(),
            kind: GroupKind::Basic,
            access_hash: None,
        }),
        tl::enums::Chat::Channel(c) => Some(GroupHandle {
            id: c.id,
            title: c.title.clone(),
            kind: if c.broadcast {
                GroupKind::Broadcast
            } else {
                GroupKind::Megagroup
            },
            access_hash: c.access_hash,
        }),
        _ => None,
    }
}

/// Privacy-blocked users come back in `missing_invitees` instead of as an RPC error.
fn check_invited(
    invited: tl::enums::messages::InvitedUsers,
    user_id: i64,
) -> std::result::Result<(), GatewayError> {
    let tl::enums::messages::InvitedUsers::Users(invited) = invited;
    let missing = invited.missing_invitees.iter().find_map(|m| match m {
        tl::enums::MissingInvitee::Invitee(m) if m.user_id == user_id => Some(m),
        _ => None,
    });
    match missing {
        None => Ok(()),
        Some(m) if m.premium_would_allow_invite => Err(GatewayError::PrivacyRestricted(format!(
            "user {user_id} only accepts invites from premium accounts"
        ))),
        Some(_) => Err(GatewayError::PrivacyRestricted(format!(
            "user {user_id} could not be invited due to privacy settings"
        ))),
    }
}

/// Map a library error to the conditions the core distinguishes.
pub(crate) fn map_invocation(e: InvocationError) -> GatewayError {
    match &e {
        InvocationError::Rpc(rpc) => classify_rpc(&rpc.name, rpc.value, e.to_string()),
        _ => GatewayError::Other(e.to_string()),
    }
}

fn classify_rpc(name: &str, value: Option<u32>, text: String) -> GatewayError {
    match name {
        "FLOOD_WAIT" | "FLOOD_PREMIUM_WAIT" | "SLOWMODE_WAIT" => GatewayError::RateLimited {
            seconds: u64::from(value.unwrap_or(0)),
        },
        "USER_PRIVACY_RESTRICTED" => GatewayError::PrivacyRestricted(text),
        "USER_NOT_PARTICIPANT" => GatewayError::NotParticipant(text),
        "CHANNEL_PRIVATE" => GatewayError::ChannelPrivate(text),
        "USERNAME_NOT_OCCUPIED" | "USERNAME_INVALID" | "INVITE_HASH_EXPIRED"
        | "INVITE_HASH_INVALID" | "CHANNEL_INVALID" | "PEER_ID_INVALID" => {
            GatewayError::GroupNotFound(text)
        }
        "AUTH_KEY_UNREGISTERED" | "SESSION_REVOKED" | "SESSION_EXPIRED" | "USER_DEACTIVATED" => {
            GatewayError::Unauthorized(text)
        }
        _ => GatewayError::Other(text),
    }
}
