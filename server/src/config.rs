use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use platform_authn::AuthConfig;

const MIN_SECRET_BYTES: usize = 32;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 24 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let secret = std::env::var("AUTH_SECRET_BASE64").context("AUTH_SECRET_BASE64 missing")?;
        let secret_bytes = decode_secret(&secret)?;

        let session_ttl_minutes = match std::env::var("SESSION_TTL_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .with_context(|| format!("invalid SESSION_TTL_MINUTES {raw:?}"))?,
            Err(_) => DEFAULT_SESSION_TTL_MINUTES,
        };

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Ok(Self {
            auth: AuthConfig::new(secret_bytes, session_ttl_minutes),
            cors_allowed_origins,
            upload_dir,
        })
    }
}

fn decode_secret(encoded: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .context("invalid AUTH_SECRET_BASE64")?;
    if bytes.len() < MIN_SECRET_BYTES {
        return Err(anyhow!(
            "AUTH_SECRET_BASE64 must decode to at least {MIN_SECRET_BYTES} bytes"
        ));
    }
    Ok(bytes)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_or_malformed_secrets_are_rejected() {
        assert!(decode_secret("c2hvcnQ=").is_err());
        assert!(decode_secret("!!not base64!!").is_err());
        let long = STANDARD.encode([7u8; 48]);
        assert_eq!(decode_secret(&format!(" {long}\n")).unwrap().len(), 48);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }
}
