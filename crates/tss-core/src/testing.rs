//! In-memory port implementations shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    ops::ControlFlow,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::{
    domain::{Account, GroupHandle, GroupKind, MessageInfo, Participant},
    errors::GatewayError,
    events::{Event, Question},
    ports::{ActiveSession, Console, NoticeKind, TelegramGateway},
    Result,
};

pub fn tmp_dir(prefix: &str) -> PathBuf {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("{prefix}-{}-{ts}", std::process::id()))
}

pub fn group(id: i64, title: &str) -> GroupHandle {
    GroupHandle {
        id,
        title: title.to_string(),
        kind: GroupKind::Megagroup,
        access_hash: Some(id * 10),
    }
}

pub fn user(id: i64, first: &str) -> Participant {
    Participant {
        id,
        access_hash: Some(id + 1000),
        first_name: Some(first.to_string()),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub groups: HashMap<String, GroupHandle>,
    pub participants: Vec<Participant>,
    pub messages: Vec<MessageInfo>,
    /// Scripted invite results per user id; unscripted invites succeed.
    pub invite_script: Mutex<HashMap<i64, VecDeque<std::result::Result<(), GatewayError>>>>,
    pub invites: Mutex<Vec<(i64, i64, i64)>>,
    pub disconnected: Mutex<bool>,
}

impl FakeGateway {
    pub fn with_group(mut self, reference: &str, handle: GroupHandle) -> Self {
        self.groups.insert(reference.to_string(), handle);
        self
    }

    pub fn script_invite(&self, user_id: i64, results: Vec<std::result::Result<(), GatewayError>>) {
        self.invite_script
            .lock()
            .unwrap()
            .insert(user_id, results.into());
    }

    pub fn invited_ids(&self) -> Vec<i64> {
        self.invites.lock().unwrap().iter().map(|(_, u, _)| *u).collect()
    }
}

pub fn session(gateway: &Arc<FakeGateway>) -> ActiveSession {
    ActiveSession::new(
        "test".to_string(),
        Account {
            id: 1,
            first_name: "Tester".to_string(),
            username: Some("tester".to_string()),
        },
        Box::new(Arc::clone(gateway)),
    )
}

#[async_trait]
impl TelegramGateway for FakeGateway {
    async fn me(&self) -> std::result::Result<Account, GatewayError> {
        Ok(Account {
            id: 1,
            first_name: "Tester".to_string(),
            username: None,
        })
    }

    async fn resolve_group(&self, reference: &str) -> std::result::Result<GroupHandle, GatewayError> {
        self.groups
            .get(reference)
            .cloned()
            .ok_or_else(|| GatewayError::GroupNotFound(reference.to_string()))
    }

    async fn for_each_participant(
        &self,
        _group: &GroupHandle,
        on_participant: &mut (dyn FnMut(Participant) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        for p in &self.participants {
            if on_participant(p.clone()).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn for_each_message(
        &self,
        _group: &GroupHandle,
        limit: usize,
        on_message: &mut (dyn FnMut(MessageInfo) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        for m in self.messages.iter().take(limit) {
            if on_message(m.clone()).is_break() {
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
        self.invites
            .lock()
            .unwrap()
            .push((target.id, user_id, access_hash));
        let next = self
            .invite_script
            .lock()
            .unwrap()
            .get_mut(&user_id)
            .and_then(|q| q.pop_front());
        next.unwrap_or(Ok(()))
    }

    async fn disconnect(&self) -> std::result::Result<(), GatewayError> {
        *self.disconnected.lock().unwrap() = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    pub events: Mutex<Vec<Event>>,
    pub notices: Mutex<Vec<(NoticeKind, String)>>,
    pub answers: Mutex<VecDeque<String>>,
    pub questions: Mutex<Vec<Question>>,
}

impl RecordingConsole {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Console for RecordingConsole {
    fn notify(&self, kind: NoticeKind, text: &str) {
        self.notices.lock().unwrap().push((kind, text.to_string()));
    }

    fn report(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    async fn prompt(&self, _text: &str) -> Result<String> {
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn confirm(&self, question: Question) -> Result<bool> {
        self.questions.lock().unwrap().push(question);
        let answer = self.answers.lock().unwrap().pop_front().unwrap_or_default();
        Ok(crate::ports::is_yes(&answer))
    }
}
