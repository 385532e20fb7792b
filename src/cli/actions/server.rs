use crate::api;
use crate::auth::{AuthConfig, TokenConfig};
use crate::cli::actions::Action;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
            token_issuer,
            token_audience,
            access_token_ttl_minutes,
            code_ttl_minutes,
            resend_cooldown_seconds,
        } => {
            let token_config = TokenConfig::new(token_secret, token_issuer, token_audience)
                .with_access_ttl_minutes(access_token_ttl_minutes);

            let auth_config = AuthConfig::new()
                .with_code_ttl_minutes(code_ttl_minutes)
                .with_resend_cooldown_seconds(resend_cooldown_seconds);

            api::new(port, dsn, token_config, auth_config).await?;
        }
    }

    Ok(())
}
