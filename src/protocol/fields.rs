//! Field extraction and command matching (the command dispatcher).

use super::FIELD_DELIMITER;

/// Return field `index` of a comma-delimited sentence.
///
/// Field 0 is the message name.  The field ends at the next delimiter or at
/// the end of the sentence.  If the sentence has fewer than `index`
/// delimiters the scan runs off the end and the result is whatever trails
/// the last delimiter seen, which is empty; the slice never leaves the
/// sentence bounds.
pub fn extract_field(sentence: &[u8], index: usize) -> &[u8] {
    let mut start = 0;
    let mut seen = 0;
    while seen < index && start < sentence.len() {
        if sentence[start] == FIELD_DELIMITER {
            seen += 1;
        }
        start += 1;
    }

    let rest = &sentence[start..];
    let len = rest
        .iter()
        .position(|&b| b == FIELD_DELIMITER || b == 0)
        .unwrap_or(rest.len());
    &rest[..len]
}

/// Relay action carried in the command field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayCommand {
    On,
    Off,
}

impl RelayCommand {
    /// Match a command field against the known literals.
    ///
    /// Anything else yields `None`, and `None` never changes relay state.
    pub fn from_field(field: &[u8]) -> Option<Self> {
        match field {
            b"ON" => Some(Self::On),
            b"OFF" => Some(Self::Off),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl core::fmt::Display for RelayCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
