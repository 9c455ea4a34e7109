//! Interface records, collections and reconciliation states.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{IntfCfgError, IntfCfgResult};
use crate::ethernet::{FecMode, Speed};

/// Default MTU of every interface kind except management.
pub const DEFAULT_MTU: u32 = 9100;

/// Default MTU of the management interface.
pub const MANAGEMENT_MTU: u32 = 1500;

/// Canonical spellings of known name prefixes, longest first where one
/// prefix extends another.
const CANONICAL_PREFIXES: [&str; 6] = [
    "Ethernet",
    "Eth",
    "Loopback",
    "Management",
    "PortChannel",
    "Vlan",
];

/// Interface kind, derived from the name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceKind {
    /// Front-panel Ethernet port
    Physical,
    /// Virtual loopback interface
    Loopback,
    /// Out-of-band management port
    Management,
    /// Any other interface (port channels, VLANs)
    Other,
}

impl InterfaceKind {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("Eth") {
            Self::Physical
        } else if name.starts_with("Loopback") {
            Self::Loopback
        } else if name.starts_with("Management") {
            Self::Management
        } else {
            Self::Other
        }
    }

    /// Whether description/enabled/mtu are managed for this kind.
    pub fn has_common_attrs(&self) -> bool {
        !matches!(self, Self::Loopback)
    }

    pub fn is_physical(&self) -> bool {
        matches!(self, Self::Physical)
    }

    pub fn is_loopback(&self) -> bool {
        matches!(self, Self::Loopback)
    }

    /// Returns the reset values of the common attributes.
    pub fn defaults(&self) -> KindDefaults {
        match self {
            Self::Management => KindDefaults {
                description: "Management0",
                mtu: MANAGEMENT_MTU,
                enabled: true,
            },
            _ => KindDefaults {
                description: "",
                mtu: DEFAULT_MTU,
                enabled: false,
            },
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => write!(f, "physical"),
            Self::Loopback => write!(f, "loopback"),
            Self::Management => write!(f, "management"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Reset values of the common attributes for one interface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDefaults {
    pub description: &'static str,
    pub mtu: u32,
    pub enabled: bool,
}

/// A normalized interface name with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InterfaceName {
    name: String,
    kind: InterfaceKind,
}

impl PartialOrd for InterfaceName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InterfaceName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl InterfaceName {
    pub fn new(raw: &str) -> Self {
        let name = normalize_name(raw.trim());
        let kind = InterfaceKind::from_name(&name);
        Self { name, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InterfaceKind {
        self.kind
    }
}

fn normalize_name(raw: &str) -> String {
    for prefix in CANONICAL_PREFIXES {
        if let Some(head) = raw.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return format!("{}{}", prefix, &raw[prefix.len()..]);
            }
        }
    }
    raw.to_string()
}

impl From<String> for InterfaceName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for InterfaceName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<InterfaceName> for String {
    fn from(v: InterfaceName) -> Self {
        v.name
    }
}

impl PartialEq<str> for InterfaceName {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for InterfaceName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One interface's configuration. Every attribute except the name is
/// optional; an absent attribute is neither compared nor written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: InterfaceName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_negotiate: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_speed_set"
    )]
    pub advertised_speed: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fec: Option<FecMode>,
}

impl InterfaceRecord {
    pub fn new(name: impl Into<InterfaceName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            mtu: None,
            enabled: None,
            speed: None,
            auto_negotiate: None,
            advertised_speed: None,
            fec: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = Some(mtu);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_auto_negotiate(mut self, auto_negotiate: bool) -> Self {
        self.auto_negotiate = Some(auto_negotiate);
        self
    }

    pub fn with_advertised_speed<I, S>(mut self, speeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.advertised_speed = Some(speeds.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_fec(mut self, fec: FecMode) -> Self {
        self.fec = Some(fec);
        self
    }

    pub fn kind(&self) -> InterfaceKind {
        self.name.kind()
    }

    /// Returns a record carrying only the name.
    pub fn name_only(&self) -> Self {
        Self::new(self.name.clone())
    }

    /// Clears every attribute that is not legal for this record's kind.
    pub fn without_illegal(mut self) -> Self {
        let kind = self.kind();
        if !Attribute::Description.applies_to(kind) {
            self.description = None;
            self.enabled = None;
            self.mtu = None;
        }
        if !Attribute::Speed.applies_to(kind) {
            self.speed = None;
            self.auto_negotiate = None;
            self.advertised_speed = None;
            self.fec = None;
        }
        self
    }

    /// Copies every attribute set on `other` into `self`.
    pub fn overlay(&mut self, other: &InterfaceRecord) {
        if other.description.is_some() {
            self.description.clone_from(&other.description);
        }
        if other.mtu.is_some() {
            self.mtu = other.mtu;
        }
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.speed.is_some() {
            self.speed = other.speed;
        }
        if other.auto_negotiate.is_some() {
            self.auto_negotiate = other.auto_negotiate;
        }
        if other.advertised_speed.is_some() {
            self.advertised_speed.clone_from(&other.advertised_speed);
        }
        if other.fec.is_some() {
            self.fec = other.fec;
        }
    }
}

/// Advertised speeds arrive as strings or bare Mbps numbers.
fn deserialize_speed_set<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SpeedEntry {
        Text(String),
        Number(u64),
    }

    let entries: Option<Vec<SpeedEntry>> = Option::deserialize(deserializer)?;
    Ok(entries.map(|entries| {
        entries
            .into_iter()
            .map(|entry| match entry {
                SpeedEntry::Text(s) => s.trim().to_string(),
                SpeedEntry::Number(n) => n.to_string(),
            })
            .collect()
    }))
}

/// A managed interface attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Description,
    Enabled,
    Mtu,
    Fec,
    Speed,
    AutoNegotiate,
    AdvertisedSpeed,
}

impl Attribute {
    /// Every attribute, in reset order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Description,
        Attribute::Enabled,
        Attribute::Mtu,
        Attribute::Fec,
        Attribute::Speed,
        Attribute::AutoNegotiate,
        Attribute::AdvertisedSpeed,
    ];

    /// Whether this attribute is legal for interfaces of `kind`.
    pub fn applies_to(&self, kind: InterfaceKind) -> bool {
        match self {
            Self::Description | Self::Enabled | Self::Mtu => kind.has_common_attrs(),
            Self::Fec | Self::Speed | Self::AutoNegotiate | Self::AdvertisedSpeed => {
                kind.is_physical()
            }
        }
    }

    /// Whether `record` carries a value for this attribute.
    pub fn is_set(&self, record: &InterfaceRecord) -> bool {
        match self {
            Self::Description => record.description.is_some(),
            Self::Enabled => record.enabled.is_some(),
            Self::Mtu => record.mtu.is_some(),
            Self::Fec => record.fec.is_some(),
            Self::Speed => record.speed.is_some(),
            Self::AutoNegotiate => record.auto_negotiate.is_some(),
            Self::AdvertisedSpeed => record.advertised_speed.is_some(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Enabled => "enabled",
            Self::Mtu => "mtu",
            Self::Fec => "fec",
            Self::Speed => "speed",
            Self::AutoNegotiate => "auto_negotiate",
            Self::AdvertisedSpeed => "advertised_speed",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered collection of interface records with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceList {
    records: Vec<InterfaceRecord>,
}

impl InterfaceList {
    /// Builds a list, rejecting duplicate names.
    pub fn new(records: Vec<InterfaceRecord>) -> IntfCfgResult<Self> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(record.name.as_str()) {
                return Err(IntfCfgError::DuplicateInterface {
                    name: record.name.to_string(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn get(&self, name: &InterfaceName) -> Option<&InterfaceRecord> {
        self.records.iter().find(|r| &r.name == name)
    }

    pub fn contains(&self, name: &InterfaceName) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InterfaceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns the record named `name`.
    pub fn remove(&mut self, name: &InterfaceName) -> Option<InterfaceRecord> {
        let pos = self.records.iter().position(|r| &r.name == name)?;
        Some(self.records.remove(pos))
    }

    /// Replaces the record with the same name, or appends it.
    pub fn upsert(&mut self, record: InterfaceRecord) {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Keeps only the records matching `f`.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&InterfaceRecord) -> bool,
    {
        self.records.retain(f);
    }

    pub fn sort_by_name(&mut self) {
        self.records.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn into_vec(self) -> Vec<InterfaceRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a InterfaceList {
    type Item = &'a InterfaceRecord;
    type IntoIter = std::slice::Iter<'a, InterfaceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for InterfaceList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InterfaceList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<InterfaceRecord>::deserialize(deserializer)?;
        InterfaceList::new(records).map_err(serde::de::Error::custom)
    }
}

/// Reconciliation state requested by the operator, also used to tag
/// reported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Merged,
    Replaced,
    Overridden,
    Deleted,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Replaced => "replaced",
            Self::Overridden => "overridden",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merged" => Ok(Self::Merged),
            "replaced" => Ok(Self::Replaced),
            "overridden" => Ok(Self::Overridden),
            "deleted" => Ok(Self::Deleted),
            _ => Err(format!("Unknown state: {}", s)),
        }
    }
}

/// A record to realize on one interface, tagged with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(flatten)]
    pub record: InterfaceRecord,
    pub state: State,
}

impl Command {
    pub fn new(record: InterfaceRecord, state: State) -> Self {
        Self { record, state }
    }

    pub fn name(&self) -> &InterfaceName {
        &self.record.name
    }
}
