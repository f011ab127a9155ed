//! One-shot notices carried across a redirect in the `flash` cookie.

use super::escape::{percent_decode, percent_encode};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;

const COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "warning" => Some(FlashLevel::Warning),
            "error" => Some(FlashLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// `Set-Cookie` value carrying this notice.
    pub fn to_cookie(&self) -> String {
        let value = percent_encode(&format!("{}:{}", self.level.as_str(), self.message));
        format!("{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax")
    }

    /// `Set-Cookie` value that removes the notice once shown.
    pub fn clear_cookie() -> &'static str {
        "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
    }

    /// Read the notice from the request cookies, if any. Garbage is ignored.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().strip_prefix("flash="))
            .find_map(Self::decode)
    }

    fn decode(value: &str) -> Option<Self> {
        let decoded = percent_decode(value)?;
        let (level, message) = decoded.split_once(':')?;
        Some(Self {
            level: FlashLevel::from_name(level)?,
            message: message.to_string(),
        })
    }
}
