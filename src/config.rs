use std::env;

use tracing::warn;

use crate::error::{AppError, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SOLO_TAB: &str = "Solo";
const DEFAULT_SQUAD_TAB: &str = "Squad";

/// Telegram bot credentials paired with the channel it posts into.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub chat_id: String,
}

impl BotConfig {
    /// Builds a bot config only when both halves are present. Partial
    /// configuration yields `None` so the feature stays disabled.
    pub fn from_parts(token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(Self { token, chat_id }),
            (None, None) => None,
            _ => {
                warn!("Contact bot vars incomplete, contact form disabled");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub webhook_url: String,
    pub solo_tab: String,
    pub squad_tab: String,
}

/// Process-wide configuration, loaded once at startup from the environment
/// and handed to the handlers by value. Nothing reads the environment after
/// this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub registration_bot: BotConfig,
    pub contact_bot: Option<BotConfig>,
    pub cloudinary: CloudinaryConfig,
    pub sheets: Option<SheetsConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        // The registration bot is the one mandatory sink. Refusing to start
        // beats limping along with a client that can never deliver.
        let registration_bot = BotConfig {
            token: require("TELEGRAM_BOT_TOKEN")?,
            chat_id: require("TELEGRAM_CHAT_ID")?,
        };

        let contact_bot = BotConfig::from_parts(
            env::var("CONTACT_BOT_TOKEN").ok(),
            env::var("CONTACT_CHAT_ID").ok(),
        );

        let cloudinary = CloudinaryConfig {
            cloud_name: require("CLOUDINARY_CLOUD_NAME")?,
            api_key: require("CLOUDINARY_API_KEY")?,
            api_secret: require("CLOUDINARY_API_SECRET")?,
        };

        let sheets = env::var("SHEETS_WEBHOOK_URL").ok().map(|webhook_url| SheetsConfig {
            webhook_url,
            solo_tab: env::var("SHEETS_TAB_SOLO").unwrap_or_else(|_| DEFAULT_SOLO_TAB.to_string()),
            squad_tab: env::var("SHEETS_TAB_SQUAD")
                .unwrap_or_else(|_| DEFAULT_SQUAD_TAB.to_string()),
        });

        Ok(Self {
            port,
            registration_bot,
            contact_bot,
            cloudinary,
            sheets,
        })
    }
}

fn require(key: &'static str) -> Result<String> {
    env::var(key).map_err(|_| AppError::Config(format!("Missing required env var: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_config_requires_both_parts() {
        assert!(BotConfig::from_parts(Some("token".into()), Some("chat".into())).is_some());
        assert!(BotConfig::from_parts(Some("token".into()), None).is_none());
        assert!(BotConfig::from_parts(None, Some("chat".into())).is_none());
        assert!(BotConfig::from_parts(None, None).is_none());
    }
}
