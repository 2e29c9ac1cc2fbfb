//! # QR Scan Parsing
//!
//! Turns whatever the camera (or the "enter code" field) produced into a
//! cafe to open.
//!
//! ## Accepted Payloads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cafeapp://cafe/kadikoy-01             ──► Cafe("kadikoy-01")           │
//! │  https://order.example.com/c/moda-02   ──► Cafe("moda-02")              │
//! │  https://x.com/cafe/moda-02            ──► Cafe("moda-02")              │
//! │  https://x.com/menu?cafeId=moda-02     ──► Cafe("moda-02")              │
//! │  DEMO  /  demo2  /  DEMO-3             ──► Demo(1) / Demo(2) / Demo(3)  │
//! │  KDK01  (code printed on the table)    ──► QrCode("KDK01")              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing never looks anything up. [`resolve`] matches the target
//! against a cafe list and checks the cafe is open.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::Cafe;

const MIN_CODE_LEN: usize = 3;
const MAX_CODE_LEN: usize = 64;

/// What a scan points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ScanTarget {
    /// Cafe id from a deep link or URL.
    Cafe(String),
    /// Short table code.
    QrCode(String),
    /// 1-based index into the demo cafes.
    Demo(usize),
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanTarget::Cafe(id) => write!(f, "cafe {id}"),
            ScanTarget::QrCode(code) => write!(f, "code {code}"),
            ScanTarget::Demo(n) => write!(f, "DEMO-{n}"),
        }
    }
}

/// Scan and resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("Scanned code is empty")]
    Empty,

    /// Payload is not one of the accepted shapes.
    #[error("Not a cafe code: {0}")]
    InvalidPayload(String),

    /// Well-formed, but no cafe has that id or code.
    #[error("No cafe found for {0}")]
    UnknownCafe(String),

    /// The cafe exists but is not taking orders.
    ///
    /// ## When This Occurs
    /// - The cafe was deactivated by an admin
    /// - A customer scans an old sticker at a closed branch
    #[error("{name} is currently closed")]
    CafeInactive { name: String },
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_CODE_LEN && id.chars().all(is_code_char)
}

/// Parses a scanned or typed payload.
pub fn parse_scan(input: &str) -> Result<ScanTarget, QrError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(QrError::Empty);
    }
    let invalid = || QrError::InvalidPayload(raw.to_string());
    let lower = raw.to_ascii_lowercase();

    if lower.starts_with("cafeapp://") {
        let rest = &raw["cafeapp://".len()..];
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        return match (segments.next(), segments.next(), segments.next()) {
            (Some(kind), Some(id), None) if kind.eq_ignore_ascii_case("cafe") && valid_id(id) => {
                Ok(ScanTarget::Cafe(id.to_string()))
            }
            _ => Err(invalid()),
        };
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return parse_web_url(raw).ok_or_else(invalid);
    }

    if let Some(n) = parse_demo(&lower) {
        return if n == 0 { Err(invalid()) } else { Ok(ScanTarget::Demo(n)) };
    }

    if (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&raw.len()) && raw.chars().all(is_code_char) {
        return Ok(ScanTarget::QrCode(raw.to_string()));
    }

    Err(invalid())
}

fn parse_web_url(url: &str) -> Option<ScanTarget> {
    let after_scheme = url.split_once("://")?.1;
    let without_fragment = after_scheme.split('#').next().unwrap_or_default();
    let (host_and_path, query) = match without_fragment.split_once('?') {
        Some((hp, q)) => (hp, Some(q)),
        None => (without_fragment, None),
    };

    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if (key == "cafe" || key == "cafeId") && valid_id(value) {
                    return Some(ScanTarget::Cafe(value.to_string()));
                }
            }
        }
    }

    let mut segments = host_and_path.split('/').filter(|s| !s.is_empty());
    segments.next()?; // host
    match (segments.next(), segments.next(), segments.next()) {
        (Some("c") | Some("cafe"), Some(id), None) if valid_id(id) => {
            Some(ScanTarget::Cafe(id.to_string()))
        }
        _ => None,
    }
}

/// `demo`, `demo2`, `demo-2` → Some(1), Some(2), Some(2). Input is lowercase.
fn parse_demo(lower: &str) -> Option<usize> {
    let rest = lower.strip_prefix("demo")?;
    if rest.is_empty() {
        return Some(1);
    }
    let digits = rest.strip_prefix('-').unwrap_or(rest);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Finds the cafe a scan points at.
///
/// Ids and table codes are tried both ways so a printed code pasted into
/// a URL still works. Demo targets index into `cafes` directly.
pub fn resolve<'a>(target: &ScanTarget, cafes: &'a [Cafe]) -> Result<&'a Cafe, QrError> {
    let by_id = |id: &str| cafes.iter().find(|c| c.id == id);
    let by_code = |code: &str| cafes.iter().find(|c| c.qr_code.eq_ignore_ascii_case(code));

    let found = match target {
        ScanTarget::Cafe(id) => by_id(id).or_else(|| by_code(id)),
        ScanTarget::QrCode(code) => by_code(code).or_else(|| by_id(code)),
        ScanTarget::Demo(n) => n.checked_sub(1).and_then(|i| cafes.get(i)),
    };

    let cafe = found.ok_or_else(|| QrError::UnknownCafe(target.to_string()))?;
    if !cafe.is_active {
        return Err(QrError::CafeInactive {
            name: cafe.name.clone(),
        });
    }
    Ok(cafe)
}
