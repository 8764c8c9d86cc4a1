use std::fmt;

/// Unsigned 8-bit tag identifying a participating chain within the bridge.
/// Unique per chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub u8);

impl DomainId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }
}

impl From<u8> for DomainId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
