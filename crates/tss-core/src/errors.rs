/// Core error type.
///
/// Adapter crates map their library errors into this type so the menu loop
/// can report every failure the same way and keep running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("login failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("external error: {0}")]
    External(String),
}

/// Conditions the Telegram gateway must keep distinguishable.
///
/// Rate limits are not failures for the transfer loop; the remaining variants
/// are recorded per member or abort a whole operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("A wait of {seconds} seconds is required")]
    RateLimited { seconds: u64 },

    #[error("The user's privacy settings do not allow you to do this ({0})")]
    PrivacyRestricted(String),

    #[error("The target user is not a member of the specified megagroup or channel ({0})")]
    NotParticipant(String),

    #[error("The channel specified is private and you lack permission to access it ({0})")]
    ChannelPrivate(String),

    #[error("group not found or private: {0}")]
    GroupNotFound(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    /// Per-member precondition failures (privacy, membership, private channel).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::PrivacyRestricted(_) | Self::NotParticipant(_) | Self::ChannelPrivate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
