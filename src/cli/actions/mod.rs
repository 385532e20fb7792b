pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        token_secret: SecretString,
        token_issuer: String,
        token_audience: String,
        access_token_ttl_minutes: i64,
        code_ttl_minutes: i64,
        resend_cooldown_seconds: i64,
    },
}
