//! Dotted numeric version strings as used in the docset catalog.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::error::{Result, RxdashError};

/// A parsed `major.minor.patch`-style version.
///
/// Any number of components is accepted; each must be an unsigned integer.
/// Ordering compares components numerically, left to right, so `10.0.0` sorts
/// above `9.0.0`. The original spelling is retained for display and for the
/// minor-line computation.
#[derive(Debug, Clone)]
pub struct DocsetVersion {
    /// Version as written.
    raw: String,
    /// Numeric components.
    parts: Vec<u64>,
}

impl DocsetVersion {
    /// Parse a version string, rejecting anything that is not dot-separated digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || RxdashError::MalformedVersion(raw.to_string());
        if raw.is_empty() {
            return Err(malformed());
        }
        let parts = raw
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                part.parse::<u64>().map_err(|_| malformed())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    /// The version string as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The minor-version line: the string truncated at its last dot, or the
    /// whole string when it has fewer than two dots.
    pub fn minor_line(&self) -> &str {
        minor_line(&self.raw)
    }
}

/// Minor-version line of a raw version string.
///
/// `6.5.3` → `6.5`, `6.5` → `6.5`, `6` → `6`.
pub fn minor_line(raw: &str) -> &str {
    if raw.matches('.').count() < 2 {
        return raw;
    }
    match raw.rfind('.') {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

impl PartialEq for DocsetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DocsetVersion {}

impl PartialOrd for DocsetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocsetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Missing trailing components count as zero, so `6.5` == `6.5.0`.
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl FromStr for DocsetVersion {
    type Err = RxdashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DocsetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
