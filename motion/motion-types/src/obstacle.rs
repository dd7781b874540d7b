//! Obstacles that a planned body must keep clear of.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{BodyId, LinkId};

/// A body, or a subset of its links, treated as an obstacle.
///
/// # Example
///
/// ```
/// use motion_types::{BodyId, LinkId, Obstacle};
///
/// let table = Obstacle::body(BodyId::new(2));
/// assert!(table.links().is_none());
///
/// let shelf = Obstacle::subset(BodyId::new(3), [LinkId::new(1), LinkId::new(2)]);
/// assert_eq!(shelf.links().map(<[_]>::len), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    body: BodyId,
    links: Option<Vec<LinkId>>,
}

impl Obstacle {
    /// Every link of `body` is an obstacle.
    #[must_use]
    pub const fn body(body: BodyId) -> Self {
        Self { body, links: None }
    }

    /// Only the given links of `body` are obstacles.
    #[must_use]
    pub fn subset(body: BodyId, links: impl IntoIterator<Item = LinkId>) -> Self {
        Self {
            body,
            links: Some(links.into_iter().collect()),
        }
    }

    /// The obstacle body.
    #[must_use]
    pub const fn body_id(&self) -> BodyId {
        self.body
    }

    /// The link subset, or `None` for the whole body.
    #[must_use]
    pub fn links(&self) -> Option<&[LinkId]> {
        self.links.as_deref()
    }
}

impl From<BodyId> for Obstacle {
    fn from(body: BodyId) -> Self {
        Self::body(body)
    }
}
