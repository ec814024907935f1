use std::str::FromStr;

// TLS record-layer version identifiers as they appear in the ServerHello
const SSL30: u16 = 0x0300;
const TLS10: u16 = 0x0301;
const TLS11: u16 = 0x0302;
const TLS12: u16 = 0x0303;

/// Default lower protocol bound when the caller supplies none
pub const DEFAULT_MIN_VERSION: TlsVersion = TlsVersion::Ssl30;

/// Default upper protocol bound when the caller supplies none
pub const DEFAULT_MAX_VERSION: TlsVersion = TlsVersion::Tls12;

/// TLS protocol version, convertible in both directions between the
/// human-readable token (`ssl30`, `tls10`, ...) and the wire identifier
/// carried in the `ServerHello`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Ssl30,
    Tls10,
    Tls11,
    Tls12,
}

impl TlsVersion {
    /// Look up a version by its token
    ///
    /// Returns `None` for unrecognized tokens
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ssl30" => Some(Self::Ssl30),
            "tls10" => Some(Self::Tls10),
            "tls11" => Some(Self::Tls11),
            "tls12" => Some(Self::Tls12),
            _ => None,
        }
    }

    /// The token used in options and responses
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ssl30 => "ssl30",
            Self::Tls10 => "tls10",
            Self::Tls11 => "tls11",
            Self::Tls12 => "tls12",
        }
    }

    /// Look up a version by its wire identifier
    ///
    /// Returns `None` for values outside the table (e.g. TLS 1.3's `0x0304`)
    #[must_use]
    pub const fn from_wire(version: u16) -> Option<Self> {
        match version {
            SSL30 => Some(Self::Ssl30),
            TLS10 => Some(Self::Tls10),
            TLS11 => Some(Self::Tls11),
            TLS12 => Some(Self::Tls12),
            _ => None,
        }
    }

    /// The wire identifier of this version
    #[must_use]
    pub const fn wire(self) -> u16 {
        match self {
            Self::Ssl30 => SSL30,
            Self::Tls10 => TLS10,
            Self::Tls11 => TLS11,
            Self::Tls12 => TLS12,
        }
    }

    /// Token for a wire identifier, or the empty string when unknown
    #[must_use]
    pub fn token_for_wire(version: u16) -> &'static str {
        Self::from_wire(version).map_or("", Self::token)
    }
}

impl FromStr for TlsVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("invalid version: {s}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_token_round_trip() {
        for token in ["ssl30", "tls10", "tls11", "tls12"] {
            let version = TlsVersion::from_token(token).unwrap();
            assert_eq!(version.token(), token);
        }
    }

    #[test]
    fn test_wire_round_trip() {
        for version in [
            TlsVersion::Ssl30,
            TlsVersion::Tls10,
            TlsVersion::Tls11,
            TlsVersion::Tls12,
        ] {
            assert_eq!(TlsVersion::from_wire(version.wire()), Some(version));
        }
    }

    #[test]
    fn test_unknown_token() {
        assert!(TlsVersion::from_token("tls13").is_none());
        assert!(TlsVersion::from_token("bogus").is_none());
        assert!(TlsVersion::from_token("").is_none());
    }

    #[test]
    fn test_unknown_wire_maps_to_empty_token() {
        assert_eq!(TlsVersion::token_for_wire(0x0304), "");
        assert_eq!(TlsVersion::token_for_wire(0), "");
        assert_eq!(TlsVersion::token_for_wire(0x0303), "tls12");
    }

    #[test]
    fn test_version_ordering() {
        assert!(TlsVersion::Ssl30 < TlsVersion::Tls10);
        assert!(TlsVersion::Tls11 < TlsVersion::Tls12);
        assert!(DEFAULT_MIN_VERSION <= DEFAULT_MAX_VERSION);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tls12".parse::<TlsVersion>().unwrap(), TlsVersion::Tls12);
        assert!("sslv2".parse::<TlsVersion>().is_err());
    }
}
