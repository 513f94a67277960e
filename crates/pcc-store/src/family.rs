use std::fmt;
use std::str::FromStr;

/// The closed set of hash families the store understands.
///
/// Determines both the hash length (40 hex chars for sha1, 32 for ntlm)
/// and the subdirectory name under the store root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFamily {
    Sha1,
    Ntlm,
}

impl HashFamily {
    pub const ALL: [HashFamily; 2] = [HashFamily::Sha1, HashFamily::Ntlm];

    /// Number of hex characters in a full hash of this family, prefix included.
    pub const fn full_hash_len(self) -> usize {
        match self {
            HashFamily::Sha1 => 40,
            HashFamily::Ntlm => 32,
        }
    }

    /// Number of hex characters remaining after the 5-character prefix is stripped.
    pub const fn suffix_len(self) -> usize {
        self.full_hash_len() - PREFIX_LEN
    }

    /// Subdirectory name under the storage root.
    pub const fn dir_name(self) -> &'static str {
        match self {
            HashFamily::Sha1 => "sha1",
            HashFamily::Ntlm => "ntlm",
        }
    }
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported hash function {0:?}, expected \"sha1\" or \"ntlm\"")]
pub struct UnknownHashFamily(pub String);

impl FromStr for HashFamily {
    type Err = UnknownHashFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(HashFamily::Sha1),
            "ntlm" => Ok(HashFamily::Ntlm),
            other => Err(UnknownHashFamily(other.to_string())),
        }
    }
}

/// Number of hex characters in a k-anonymity prefix.
pub const PREFIX_LEN: usize = 5;

/// Total number of prefixes: every value in `[0, 2^20)`.
pub const PREFIX_COUNT: u32 = 1 << 20;

/// An uppercase 5-hex-character prefix, represented internally as the
/// integer in `[0, 2^20)` it corresponds to via `%05X` formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix(u32);

#[derive(Debug, thiserror::Error)]
pub enum PrefixParseError {
    #[error("prefix must be exactly {PREFIX_LEN} hex characters, got {0:?}")]
    WrongLength(String),
    #[error("prefix {0:?} is not valid hexadecimal")]
    NotHex(String),
}

impl Prefix {
    /// Builds a `Prefix` from its integer value. Panics if out of range;
    /// callers iterating `0..PREFIX_COUNT` never hit this.
    pub fn from_index(index: u32) -> Self {
        assert!(index < PREFIX_COUNT, "prefix index {index} out of range");
        Prefix(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Parses an uppercase-or-lowercase 5 hex character string.
    pub fn parse(s: &str) -> Result<Self, PrefixParseError> {
        if s.len() != PREFIX_LEN {
            return Err(PrefixParseError::WrongLength(s.to_string()));
        }
        let value = u32::from_str_radix(s, 16)
            .map_err(|_| PrefixParseError::NotHex(s.to_string()))?;
        Ok(Prefix(value))
    }

    pub fn iter_all() -> impl Iterator<Item = Prefix> {
        (0..PREFIX_COUNT).map(Prefix)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_round_trips_through_display() {
        for index in [0u32, 1, 0xABCDE, PREFIX_COUNT - 1] {
            let prefix = Prefix::from_index(index);
            let rendered = prefix.to_string();
            assert_eq!(rendered.len(), PREFIX_LEN);
            assert_eq!(Prefix::parse(&rendered).unwrap(), prefix);
        }
    }

    #[test]
    fn prefix_parse_rejects_bad_input() {
        assert!(matches!(
            Prefix::parse("ABC"),
            Err(PrefixParseError::WrongLength(_))
        ));
        assert!(matches!(
            Prefix::parse("ZZZZZ"),
            Err(PrefixParseError::NotHex(_))
        ));
    }

    #[test]
    fn family_from_str() {
        assert_eq!("sha1".parse::<HashFamily>().unwrap(), HashFamily::Sha1);
        assert_eq!("ntlm".parse::<HashFamily>().unwrap(), HashFamily::Ntlm);
        assert!("md5".parse::<HashFamily>().is_err());
    }
}
