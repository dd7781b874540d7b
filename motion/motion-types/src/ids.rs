//! Identifiers for bodies, links and joints.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a body in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Index of a link within its body.
///
/// Every body has a root link, [`LinkId::BASE`]. Links attached through
/// joints are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkId(pub u32);

impl LinkId {
    /// The root link of a body.
    pub const BASE: Self = Self(0);

    /// Create a new link ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true for the root link.
    #[must_use]
    pub const fn is_base(self) -> bool {
        self.0 == Self::BASE.0
    }
}

impl From<u32> for LinkId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_base() {
            write!(f, "Link(base)")
        } else {
            write!(f, "Link({})", self.0)
        }
    }
}

/// Index of a joint within its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointId(pub u32);

impl JointId {
    /// Create a new joint ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for JointId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// A link of a specific body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyLink {
    /// The body.
    pub body: BodyId,
    /// The link within the body.
    pub link: LinkId,
}

impl BodyLink {
    /// Create a new body/link pair.
    #[must_use]
    pub const fn new(body: BodyId, link: LinkId) -> Self {
        Self { body, link }
    }
}

impl std::fmt::Display for BodyLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.body, self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_id() {
        let id = BodyId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "Body(42)");

        let id2: BodyId = 42.into();
        assert_eq!(id, id2);
    }

    #[test]
    fn test_link_id_base() {
        assert!(LinkId::BASE.is_base());
        assert!(!LinkId::new(3).is_base());
        assert_eq!(LinkId::BASE.to_string(), "Link(base)");
        assert_eq!(LinkId::new(3).to_string(), "Link(3)");
    }

    #[test]
    fn test_body_link_display() {
        let bl = BodyLink::new(BodyId::new(1), LinkId::new(2));
        assert_eq!(bl.to_string(), "Body(1):Link(2)");
    }
}
