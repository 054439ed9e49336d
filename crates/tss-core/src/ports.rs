use std::ops::ControlFlow;

use async_trait::async_trait;

use crate::{
    domain::{Account, GroupHandle, MessageInfo, Participant},
    errors::GatewayError,
    events::{Event, Question},
    Result,
};

/// Severity of a console notification. Each kind has a fixed icon/color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
    Progress,
}

/// Hexagonal port for the interactive terminal.
#[async_trait]
pub trait Console: Send + Sync {
    fn notify(&self, kind: NoticeKind, text: &str);

    /// Render an operation event in the display language.
    fn report(&self, event: Event);

    /// Ask for one line of input (trimmed).
    async fn prompt(&self, text: &str) -> Result<String>;

    /// `y`/`Y` confirms, anything else declines.
    async fn confirm(&self, question: Question) -> Result<bool>;
}

/// Shared `y`/`n` answer parsing for console implementations.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Hexagonal port for the Telegram client library.
///
/// Iteration is callback based; the adapter owns pagination and returns when
/// the library is exhausted or the callback breaks.
#[async_trait]
pub trait TelegramGateway: Send + Sync {
    async fn me(&self) -> std::result::Result<Account, GatewayError>;

    async fn resolve_group(&self, reference: &str) -> std::result::Result<GroupHandle, GatewayError>;

    async fn for_each_participant(
        &self,
        group: &GroupHandle,
        on_participant: &mut (dyn FnMut(Participant) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError>;

    /// Most recent first, at most `limit` messages.
    async fn for_each_message(
        &self,
        group: &GroupHandle,
        limit: usize,
        on_message: &mut (dyn FnMut(MessageInfo) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError>;

    async fn invite(
        &self,
        target: &GroupHandle,
        user_id: i64,
        access_hash: i64,
    ) -> std::result::Result<(), GatewayError>;

    /// Persist the session and drop the connection.
    async fn disconnect(&self) -> std::result::Result<(), GatewayError>;
}

/// The one authenticated client of this process run, passed explicitly into
/// every operation that talks to Telegram.
pub struct ActiveSession {
    pub name: String,
    pub account: Account,
    gateway: Box<dyn TelegramGateway>,
}

impl ActiveSession {
    pub fn new(name: String, account: Account, gateway: Box<dyn TelegramGateway>) -> Self {
        Self {
            name,
            account,
            gateway,
        }
    }

    pub fn gateway(&self) -> &dyn TelegramGateway {
        self.gateway.as_ref()
    }

    pub async fn close(self) -> Result<()> {
        self.gateway.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl<T: TelegramGateway + ?Sized> TelegramGateway for std::sync::Arc<T> {
    async fn me(&self) -> std::result::Result<Account, GatewayError> {
        (**self).me().await
    }

    async fn resolve_group(&self, reference: &str) -> std::result::Result<GroupHandle, GatewayError> {
        (**self).resolve_group(reference).await
    }

    async fn for_each_participant(
        &self,
        group: &GroupHandle,
        on_participant: &mut (dyn FnMut(Participant) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        (**self).for_each_participant(group, on_participant).await
    }

    async fn for_each_message(
        &self,
        group: &GroupHandle,
        limit: usize,
        on_message: &mut (dyn FnMut(MessageInfo) -> ControlFlow<()> + Send),
    ) -> std::result::Result<(), GatewayError> {
        (**self).for_each_message(group, limit, on_message).await
    }

    async fn invite(
        &self,
        target: &GroupHandle,
        user_id: i64,
        access_hash: i64,
    ) -> std::result::Result<(), GatewayError> {
        (**self).invite(target, user_id, access_hash).await
    }

    async fn disconnect(&self) -> std::result::Result<(), GatewayError> {
        (**self).disconnect().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{session, FakeGateway};

    #[tokio::test]
    async fn closing_a_session_disconnects_its_gateway() {
        let gw = Arc::new(FakeGateway::default());
        let active = session(&gw);
        assert!(!*gw.disconnected.lock().unwrap());

        active.close().await.unwrap();
        assert!(*gw.disconnected.lock().unwrap());
    }
}
