//! One-shot flash messages
//!
//! A flash is stored in the `flash` cookie as `level:message` (message
//! URL-encoded) followed by `.` and a truncated SHA-256 tag keyed by the
//! session secret. The next HTML page reads it and clears the cookie.

use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};
use sha2::{Digest, Sha256};

pub const FLASH_COOKIE: &str = "flash";

/// Hex characters of the digest kept in the cookie
const TAG_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
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

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Signed cookie value (without the `flash=` prefix)
    pub fn encode(&self, secret: &str) -> String {
        let payload = format!(
            "{}:{}",
            self.level.as_str(),
            urlencoding::encode(&self.message)
        );
        let tag = sign(secret, &payload);
        format!("{}.{}", payload, tag)
    }

    /// Parse a cookie value, rejecting anything whose tag does not match
    pub fn decode(value: &str, secret: &str) -> Option<Self> {
        let (payload, tag) = value.rsplit_once('.')?;
        if !tags_match(&sign(secret, payload), tag) {
            return None;
        }

        let (level, message) = payload.split_once(':')?;
        Some(Self {
            level: FlashLevel::parse(level)?,
            message: urlencoding::decode(message).ok()?.into_owned(),
        })
    }

    /// Find and verify the flash cookie in request headers
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Option<Self> {
        let value = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .map(|(_, value)| value)?;

        let flash = Self::decode(value, secret);
        if flash.is_none() {
            tracing::debug!("Ignoring flash cookie with bad signature");
        }
        flash
    }

    pub fn set_cookie(&self, secret: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            self.encode(secret)
        )
    }
}

/// `Set-Cookie` value that removes the flash cookie
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", FLASH_COOKIE)
}

/// 303 redirect carrying a flash for the next page
pub fn redirect_with_flash(to: &str, flash: Flash, secret: &str) -> Response {
    (
        [(header::SET_COOKIE, flash.set_cookie(secret))],
        Redirect::to(to),
    )
        .into_response()
}

fn sign(secret: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update([0u8]);
    hasher.update(payload.as_bytes());
    let mut tag = hex::encode(hasher.finalize());
    tag.truncate(TAG_LEN);
    tag
}

/// Compare tags without stopping at the first differing byte
fn tags_match(expected: &str, actual: &str) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    expected
        .bytes()
        .zip(actual.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
