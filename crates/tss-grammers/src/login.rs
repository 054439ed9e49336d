use std::path::PathBuf;

use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;

use tss_core::{errors::Error, ports::Console, Result};

use crate::GrammersGateway;

#[derive(Clone, Debug)]
pub struct LoginParams {
    pub api_id: i32,
    pub api_hash: String,
    /// Empty means "ask for it".
    pub phone: String,
    pub session_path: PathBuf,
    pub proxy_url: Option<String>,
}

/// Localized prompt texts for the interactive sign-in.
#[derive(Clone, Copy, Debug)]
pub struct LoginPrompts<'a> {
    pub phone: &'a str,
    pub code: &'a str,
    pub password: &'a str,
}

/// Open (or create) the named session and sign in if it is not authorized yet.
///
/// Rate limits are surfaced to the caller instead of being slept on inside the
/// library (`flood_sleep_threshold: 0`).
pub async fn login(
    params: LoginParams,
    console: &dyn Console,
    prompts: LoginPrompts<'_>,
) -> Result<GrammersGateway> {
    if let Some(parent) = params.session_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let session = Session::load_file_or_create(&params.session_path)?;

    let client = Client::connect(Config {
        session,
        api_id: params.api_id,
        api_hash: params.api_hash.clone(),
        params: InitParams {
            flood_sleep_threshold: 0,
            proxy_url: params.proxy_url.clone(),
            ..Default::default()
        },
    })
    .await
    .map_err(|e| Error::Auth(format!("cannot connect: {e}")))?;

    let authorized = client
        .is_authorized()
        .await
        .map_err(|e| Error::Auth(e.to_string()))?;

    if !authorized {
        let phone = if params.phone.trim().is_empty() {
            console.prompt(prompts.phone).await?
        } else {
            params.phone.trim().to_string()
        };

        let token = client
            .request_login_code(&phone)
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;
        let code = console.prompt(prompts.code).await?;

        match client.sign_in(&token, code.trim()).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let password = console.prompt(prompts.password).await?;
                client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(|e| Error::Auth(e.to_string()))?;
            }
            Err(e) => return Err(Error::Auth(e.to_string())),
        }
        tracing::info!(path = %params.session_path.display(), "signed in");
    }

    let gateway = GrammersGateway::new(client, params.session_path);
    gateway.save_session()?;
    Ok(gateway)
}
