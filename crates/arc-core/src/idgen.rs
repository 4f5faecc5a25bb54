//! SHA256 + base36 ID generation.
//!
//! Produces the three identifier shapes named in §6: `ws-<6 chars>` for
//! workspaces, `<prefix>-<6 chars>` for top-level issues, and `plan.<5
//! chars>` for shared plans. Hierarchical issue ids (`<parent>.<n>`) are
//! allocated by the service layer from a monotonic counter, not from a
//! hash, and are handled by [`is_hierarchical_id`] / [`parent_of`] here
//! since they are pure string-level helpers with no storage dependency.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Base36 alphabet (0-9, a-z).
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Converts a byte slice to a base36 string of the specified length.
pub fn encode_base36(data: &[u8], length: usize) -> String {
    let mut num = BigUint::from_bytes_be(data);
    let base = BigUint::from(36u32);
    let zero = BigUint::zero();

    let mut chars: Vec<u8> = Vec::with_capacity(length);
    while num > zero {
        let rem = &num % &base;
        num /= &base;
        let idx = rem.to_u32_digits();
        let i = if idx.is_empty() { 0 } else { idx[0] as usize };
        chars.push(BASE36_ALPHABET[i]);
    }

    chars.reverse();
    let mut s = String::from_utf8(chars).expect("base36 chars are valid UTF-8");

    if s.len() < length {
        let padding = "0".repeat(length - s.len());
        s = padding + &s;
    }
    if s.len() > length {
        s = s[s.len() - length..].to_owned();
    }
    s
}

/// Hashes `content` and returns a base36 string of the given length.
fn hash_to_base36(content: &str, length: usize) -> String {
    let hash = Sha256::digest(content.as_bytes());
    let num_bytes = match length {
        0..=4 => 3,
        5..=6 => 4,
        _ => 5,
    };
    encode_base36(&hash[..num_bytes], length)
}

/// Generates a top-level issue id: `<prefix>-<6-char base36>`.
///
/// `nonce` is bumped by the caller on a primary-key collision (§4.2.1); it
/// is folded into the hashed content so each retry produces a different id.
pub fn generate_issue_id(
    prefix: &str,
    title: &str,
    timestamp: DateTime<Utc>,
    nonce: u32,
) -> String {
    let content = format!(
        "{}|{}|{}",
        title,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    format!("{prefix}-{}", hash_to_base36(&content, 6))
}

/// Generates a workspace id: `ws-<6-char base36>`.
pub fn generate_workspace_id(name: &str, timestamp: DateTime<Utc>, nonce: u32) -> String {
    let content = format!(
        "{}|{}|{}",
        name,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    format!("ws-{}", hash_to_base36(&content, 6))
}

/// Generates a shared-plan id: `plan.<5-char base36>`.
pub fn generate_plan_id(title: &str, timestamp: DateTime<Utc>, nonce: u32) -> String {
    let content = format!(
        "{}|{}|{}",
        title,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    format!("plan.{}", hash_to_base36(&content, 5))
}

/// Formats a hierarchical child id from its parent and allocated sequence
/// number.
pub fn format_child_id(parent_id: &str, n: i64) -> String {
    format!("{parent_id}.{n}")
}

/// Returns `true` if `id` is a hierarchical child id: its last `.`-separated
/// segment consists only of ASCII digits.
pub fn is_hierarchical_id(id: &str) -> bool {
    match id.rsplit_once('.') {
        Some((_, suffix)) => !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Returns the parent id of a hierarchical id, or `None` if `id` is not
/// hierarchical.
pub fn parent_of(id: &str) -> Option<&str> {
    if !is_hierarchical_id(id) {
        return None;
    }
    id.rsplit_once('.').map(|(parent, _)| parent)
}
