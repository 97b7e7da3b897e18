use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DeviceIdError;

/// Hardware family encoded in the first character of a device id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// `D` followed by 16 hex digits.
    Device,
    /// `G` followed by 18 hex digits.
    Gateway,
    /// `M` followed by 16 hex digits. Only accepted by [`DeviceIdProfile::Extended`].
    Mioty,
}

impl DeviceKind {
    pub fn prefix(&self) -> char {
        match self {
            DeviceKind::Device => 'D',
            DeviceKind::Gateway => 'G',
            DeviceKind::Mioty => 'M',
        }
    }

    pub fn hex_digits(&self) -> usize {
        match self {
            DeviceKind::Device => 16,
            DeviceKind::Gateway => 18,
            DeviceKind::Mioty => 16,
        }
    }

    fn from_prefix(ch: char) -> Option<Self> {
        match ch {
            'D' => Some(DeviceKind::Device),
            'G' => Some(DeviceKind::Gateway),
            'M' => Some(DeviceKind::Mioty),
            _ => None,
        }
    }
}

/// The set of id shapes a deployment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceIdProfile {
    /// `D` and `G` ids.
    Standard,
    /// `D`, `G` and `M` ids.
    #[default]
    Extended,
}

static STANDARD_PATTERN: Lazy<Regex> =
    Lazy::new(|| build_pattern(DeviceIdProfile::Standard.kinds()));
static EXTENDED_PATTERN: Lazy<Regex> =
    Lazy::new(|| build_pattern(DeviceIdProfile::Extended.kinds()));

fn build_pattern(kinds: &[DeviceKind]) -> Regex {
    let alternatives: Vec<String> = kinds
        .iter()
        .map(|kind| format!("{}[A-F0-9]{{{}}}", kind.prefix(), kind.hex_digits()))
        .collect();
    let pattern = format!("^(?:{})$", alternatives.join("|"));
    Regex::new(&pattern).expect("device id pattern is valid")
}

impl DeviceIdProfile {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceIdProfile::Standard => "standard",
            DeviceIdProfile::Extended => "extended",
        }
    }

    pub fn kinds(&self) -> &'static [DeviceKind] {
        match self {
            DeviceIdProfile::Standard => &[DeviceKind::Device, DeviceKind::Gateway],
            DeviceIdProfile::Extended => {
                &[DeviceKind::Device, DeviceKind::Gateway, DeviceKind::Mioty]
            }
        }
    }

    pub fn pattern(&self) -> &'static Regex {
        match self {
            DeviceIdProfile::Standard => &*STANDARD_PATTERN,
            DeviceIdProfile::Extended => &*EXTENDED_PATTERN,
        }
    }

    /// Anchored full-string match against this profile's pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.pattern().is_match(value)
    }
}

impl fmt::Display for DeviceIdProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceIdProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(DeviceIdProfile::Standard),
            "extended" => Ok(DeviceIdProfile::Extended),
            other => Err(format!("unknown device id profile '{other}'")),
        }
    }
}

/// A device identifier that matched a [`DeviceIdProfile`] when it was built.
///
/// The accepted charset is `[A-F0-9]` after a single letter prefix, so the
/// value is always safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId {
    value: String,
    kind: DeviceKind,
}

impl DeviceId {
    pub fn parse(profile: DeviceIdProfile, value: &str) -> Result<Self, DeviceIdError> {
        if value.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        let mismatch = || DeviceIdError::PatternMismatch {
            value: value.to_string(),
            profile: profile.name(),
        };
        if !profile.matches(value) {
            return Err(mismatch());
        }
        let kind = value
            .chars()
            .next()
            .and_then(DeviceKind::from_prefix)
            .ok_or_else(mismatch)?;

        Ok(Self {
            value: value.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
