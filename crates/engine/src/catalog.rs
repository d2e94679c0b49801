//! Light catalog, per-kind filters, and identity-preserving selection.
//!
//! The catalog is a wholesale snapshot of the lights in one document, in the
//! order the scene graph reports them. The filtered view is derived from it and
//! is what the selection indexes into.

use serde::{Deserialize, Serialize};

use crate::types::{EntityRef, LightEntity, LightKind};

/// Per-kind visibility toggles for the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
	pub area: bool,
	pub point: bool,
	pub spot: bool,
	pub sun: bool,
}

impl Default for FilterState {
	fn default() -> Self {
		Self {
			area: true,
			point: true,
			spot: true,
			sun: true,
		}
	}
}

impl FilterState {
	/// Returns whether lights of `kind` are listed.
	pub const fn is_enabled(&self, kind: LightKind) -> bool {
		match kind {
			LightKind::Area => self.area,
			LightKind::Point => self.point,
			LightKind::Spot => self.spot,
			LightKind::Sun => self.sun,
		}
	}

	/// Sets the toggle for `kind`, returning true when it changes.
	pub fn set(&mut self, kind: LightKind, enabled: bool) -> bool {
		let slot = match kind {
			LightKind::Area => &mut self.area,
			LightKind::Point => &mut self.point,
			LightKind::Spot => &mut self.spot,
			LightKind::Sun => &mut self.sun,
		};
		if *slot == enabled {
			return false;
		}
		*slot = enabled;
		true
	}
}

/// Selection over the filtered view.
///
/// `index` is `-1` when nothing is selected; `identity` remembers which entity
/// was selected so the index can be re-resolved after the view is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
	pub index: isize,
	pub identity: Option<EntityRef>,
}

impl Selection {
	/// The empty selection.
	pub const NONE: Selection = Selection { index: -1, identity: None };

	pub const fn is_none(&self) -> bool {
		self.index < 0
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::NONE
	}
}

/// Lights of one document plus their filtered view and selection.
#[derive(Debug, Clone, Default)]
pub struct LightCatalog {
	lights: Vec<LightEntity>,
	filtered: Vec<LightEntity>,
	filters: FilterState,
	selection: Selection,
}

impl LightCatalog {
	/// Creates an empty catalog with the given filters.
	pub fn new(filters: FilterState) -> Self {
		Self {
			filters,
			..Self::default()
		}
	}

	/// Replaces the catalog with a fresh enumeration, preserving graph order.
	///
	/// The filtered view is left untouched until [`Self::refresh_filtered`].
	pub fn replace_lights(&mut self, lights: Vec<LightEntity>) {
		tracing::trace!(count = lights.len(), "catalog.replace");
		self.lights = lights;
	}

	/// Rebuilds the filtered view from the catalog and repairs the selection.
	pub fn refresh_filtered(&mut self) {
		let previous = self.selected().map(|light| light.id).or(self.selection.identity);

		self.filtered = self.lights.iter().filter(|light| self.filters.is_enabled(light.kind)).cloned().collect();

		self.selection = match previous.and_then(|id| self.position_in_filtered(id).map(|pos| (pos, id))) {
			Some((pos, id)) => Selection {
				index: pos as isize,
				identity: Some(id),
			},
			None => Selection::NONE,
		};

		tracing::trace!(
			catalog = self.lights.len(),
			filtered = self.filtered.len(),
			selected = self.selection.index,
			"catalog.filtered"
		);
	}

	/// Toggles one filter and rebuilds the view when it changed.
	///
	/// Returns true when the filter state changed.
	pub fn set_filter(&mut self, kind: LightKind, enabled: bool) -> bool {
		if !self.filters.set(kind, enabled) {
			return false;
		}
		self.refresh_filtered();
		true
	}

	/// Selects the filtered entry at `index`; out-of-range indices clear the selection.
	pub fn select(&mut self, index: isize) {
		self.selection = usize::try_from(index)
			.ok()
			.and_then(|i| self.filtered.get(i))
			.map(|light| Selection {
				index,
				identity: Some(light.id),
			})
			.unwrap_or(Selection::NONE);
	}

	/// Returns the selected light when the index is in range.
	pub fn selected(&self) -> Option<&LightEntity> {
		usize::try_from(self.selection.index).ok().and_then(|i| self.filtered.get(i))
	}

	/// Restores persisted filters and selection; the view is rebuilt on next refresh.
	pub fn restore(&mut self, filters: FilterState, selection: Selection) {
		self.filters = filters;
		self.selection = selection;
	}

	pub fn lights(&self) -> &[LightEntity] {
		&self.lights
	}

	pub fn filtered(&self) -> &[LightEntity] {
		&self.filtered
	}

	pub fn filters(&self) -> FilterState {
		self.filters
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// Looks up a light in the full catalog.
	pub fn light(&self, id: EntityRef) -> Option<&LightEntity> {
		self.lights.iter().find(|light| light.id == id)
	}

	fn position_in_filtered(&self, id: EntityRef) -> Option<usize> {
		self.filtered.iter().position(|light| light.id == id)
	}
}
