//! Per-document channel bindings.

use indexmap::IndexMap;

use crate::types::{Channel, ChannelId, EntityRef};

/// Result of [`ChannelRegistry::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
	/// A new channel was allocated.
	Created(ChannelId),
	/// The entity was already bound; nothing changed.
	Existing(ChannelId),
}

impl AssignOutcome {
	pub const fn id(self) -> ChannelId {
		match self {
			AssignOutcome::Created(id) | AssignOutcome::Existing(id) => id,
		}
	}
}

/// Channel bookkeeping for one document.
///
/// Holds at most one channel per entity. Insertion order is preserved so
/// views are rebuilt in the order the user created them.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
	channels: IndexMap<ChannelId, EntityRef>,
}

impl ChannelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `entity` to a fresh channel unless it is already bound.
	pub fn assign(&mut self, entity: EntityRef) -> AssignOutcome {
		if let Some(id) = self.lookup_by_entity(entity) {
			return AssignOutcome::Existing(id);
		}
		let id = ChannelId::fresh();
		self.channels.insert(id, entity);
		AssignOutcome::Created(id)
	}

	/// Inserts a restored channel, refusing duplicate ids or entities.
	pub fn insert(&mut self, channel: Channel) -> bool {
		if self.channels.contains_key(&channel.id) || self.lookup_by_entity(channel.entity).is_some() {
			return false;
		}
		self.channels.insert(channel.id, channel.entity);
		true
	}

	/// Deletes one channel, returning it when it existed.
	pub fn remove(&mut self, id: ChannelId) -> Option<Channel> {
		self.channels.shift_remove(&id).map(|entity| Channel { id, entity })
	}

	/// Returns the channel bound to `entity`, if any.
	pub fn lookup_by_entity(&self, entity: EntityRef) -> Option<ChannelId> {
		self.channels.iter().find_map(|(id, bound)| (*bound == entity).then_some(*id))
	}

	pub fn get(&self, id: ChannelId) -> Option<Channel> {
		self.channels.get(&id).map(|entity| Channel { id, entity: *entity })
	}

	pub fn contains(&self, id: ChannelId) -> bool {
		self.channels.contains_key(&id)
	}

	/// Channels in creation order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = Channel> + '_ {
		self.channels.iter().map(|(id, entity)| Channel { id: *id, entity: *entity })
	}

	pub fn len(&self) -> usize {
		self.channels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.channels.is_empty()
	}
}
