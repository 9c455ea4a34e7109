//! Ethernet link-layer value types: port speed and FEC mode.
//!
//! Both are symbolic openconfig identities. On the wire they travel with
//! their defining YANG module prefix (`openconfig-if-ethernet:SPEED_40GB`,
//! `openconfig-platform-types:FEC_RS`); in records they are kept bare.

use std::fmt;

use serde::{Deserialize, Serialize};

/// YANG module prefix of speed identities.
pub const SPEED_MODULE_PREFIX: &str = "openconfig-if-ethernet:";

/// YANG module prefix of FEC identities.
pub const FEC_MODULE_PREFIX: &str = "openconfig-platform-types:";

/// Port speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Speed {
    /// Hardware default (sentinel).
    Default,
    Speed10Mb,
    Speed100Mb,
    Speed1Gb,
    Speed2500Mb,
    Speed5Gb,
    Speed10Gb,
    Speed20Gb,
    Speed25Gb,
    Speed40Gb,
    Speed50Gb,
    Speed100Gb,
    Speed200Gb,
    Speed400Gb,
    Speed800Gb,
}

/// Megabits per second to speed identity.
const SPEED_MAP: [(u32, Speed); 15] = [
    (0, Speed::Default),
    (10, Speed::Speed10Mb),
    (100, Speed::Speed100Mb),
    (1000, Speed::Speed1Gb),
    (2500, Speed::Speed2500Mb),
    (5000, Speed::Speed5Gb),
    (10000, Speed::Speed10Gb),
    (20000, Speed::Speed20Gb),
    (25000, Speed::Speed25Gb),
    (40000, Speed::Speed40Gb),
    (50000, Speed::Speed50Gb),
    (100000, Speed::Speed100Gb),
    (200000, Speed::Speed200Gb),
    (400000, Speed::Speed400Gb),
    (800000, Speed::Speed800Gb),
];

impl Speed {
    /// Maps a rate in Mbps to its identity, if the rate is a standard one.
    pub fn from_mbps(mbps: u32) -> Option<Self> {
        SPEED_MAP
            .iter()
            .find(|(rate, _)| *rate == mbps)
            .map(|(_, speed)| *speed)
    }

    /// Returns the rate in Mbps (0 for the default sentinel).
    pub fn mbps(&self) -> u32 {
        SPEED_MAP
            .iter()
            .find(|(_, speed)| speed == self)
            .map(|(rate, _)| *rate)
            .unwrap_or(0)
    }

    /// Returns the bare identity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "SPEED_DEFAULT",
            Self::Speed10Mb => "SPEED_10MB",
            Self::Speed100Mb => "SPEED_100MB",
            Self::Speed1Gb => "SPEED_1GB",
            Self::Speed2500Mb => "SPEED_2500MB",
            Self::Speed5Gb => "SPEED_5GB",
            Self::Speed10Gb => "SPEED_10GB",
            Self::Speed20Gb => "SPEED_20GB",
            Self::Speed25Gb => "SPEED_25GB",
            Self::Speed40Gb => "SPEED_40GB",
            Self::Speed50Gb => "SPEED_50GB",
            Self::Speed100Gb => "SPEED_100GB",
            Self::Speed200Gb => "SPEED_200GB",
            Self::Speed400Gb => "SPEED_400GB",
            Self::Speed800Gb => "SPEED_800GB",
        }
    }

    /// Returns the identity with its YANG module prefix.
    pub fn qualified(&self) -> String {
        format!("{}{}", SPEED_MODULE_PREFIX, self.as_str())
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix(SPEED_MODULE_PREFIX).unwrap_or(s);
        SPEED_MAP
            .iter()
            .map(|(_, speed)| *speed)
            .find(|speed| speed.as_str().eq_ignore_ascii_case(bare))
            .ok_or_else(|| format!("Unknown port speed: {}", s))
    }
}

impl TryFrom<String> for Speed {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Speed> for String {
    fn from(v: Speed) -> Self {
        v.as_str().to_string()
    }
}

/// FEC (Forward Error Correction) mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FecMode {
    /// Reed-Solomon FEC.
    Rs,
    /// FireCode FEC.
    Fc,
    /// No FEC.
    #[default]
    Disabled,
    /// Platform default FEC.
    Default,
    /// Auto-negotiated FEC.
    Auto,
}

impl FecMode {
    /// Returns the bare identity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs => "FEC_RS",
            Self::Fc => "FEC_FC",
            Self::Disabled => "FEC_DISABLED",
            Self::Default => "FEC_DEFAULT",
            Self::Auto => "FEC_AUTO",
        }
    }

    /// Returns the identity with its YANG module prefix.
    pub fn qualified(&self) -> String {
        format!("{}{}", FEC_MODULE_PREFIX, self.as_str())
    }
}

impl fmt::Display for FecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FecMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix(FEC_MODULE_PREFIX).unwrap_or(s);
        match bare.to_uppercase().as_str() {
            "FEC_RS" => Ok(Self::Rs),
            "FEC_FC" => Ok(Self::Fc),
            "FEC_DISABLED" => Ok(Self::Disabled),
            "FEC_DEFAULT" => Ok(Self::Default),
            "FEC_AUTO" => Ok(Self::Auto),
            _ => Err(format!("Unknown FEC mode: {}", s)),
        }
    }
}

impl TryFrom<String> for FecMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FecMode> for String {
    fn from(v: FecMode) -> Self {
        v.as_str().to_string()
    }
}
