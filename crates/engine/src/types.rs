//! Identity and value types shared across the engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Host-assigned identity of a document (scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "doc#{}", self.0)
	}
}

/// Stable host identity of an entity in a document's object graph.
///
/// Entity names are mutable and may collide, so bindings always key on this
/// reference instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef(pub u64);

impl fmt::Display for EntityRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "entity#{}", self.0)
	}
}

/// Light kinds the catalog can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
	Area,
	Point,
	Spot,
	Sun,
}

impl LightKind {
	/// All kinds, in filter-toggle order.
	pub const ALL: [LightKind; 4] = [LightKind::Area, LightKind::Point, LightKind::Spot, LightKind::Sun];

	/// Returns the lowercase label used in logs and diagnostics.
	pub const fn as_str(self) -> &'static str {
		match self {
			LightKind::Area => "area",
			LightKind::Point => "point",
			LightKind::Spot => "spot",
			LightKind::Sun => "sun",
		}
	}
}

impl fmt::Display for LightKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Read-only view of one light in the host's object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightEntity {
	pub id: EntityRef,
	pub name: String,
	pub kind: LightKind,
}

impl LightEntity {
	pub fn new(id: EntityRef, name: impl Into<String>, kind: LightKind) -> Self {
		Self { id, name: name.into(), kind }
	}
}

/// Process-wide unique channel token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(Uuid);

impl ChannelId {
	/// Allocates a fresh token.
	pub fn fresh() -> Self {
		Self(Uuid::new_v4())
	}

	/// Wraps an existing token, e.g. one restored from persisted state.
	pub const fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	pub const fn as_uuid(&self) -> Uuid {
		self.0
	}
}

impl fmt::Display for ChannelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.simple())
	}
}

/// A persistent binding from a unique id to one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
	pub id: ChannelId,
	pub entity: EntityRef,
}
