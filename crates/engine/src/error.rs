//! Error types for the engine and its host seam.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ChannelId, DocumentId, EntityRef};

/// Failures reported by a host adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The document no longer resolves (deleted or unloaded).
	#[error("document {0} is no longer available")]
	DocumentGone(DocumentId),

	/// There is no active document to reason about.
	#[error("no active document")]
	NoActiveDocument,

	/// The presentation layer refused a view registration.
	#[error("view type '{type_name}' rejected: {reason}")]
	ViewRejected {
		/// Static type discriminator of the rejected view.
		type_name: String,
		/// Host-supplied reason.
		reason: String,
	},

	/// The presentation layer has no view registered under the type name.
	#[error("view type '{0}' is not registered")]
	ViewMissing(String),

	/// Scheduler or lifecycle subscription could not be installed.
	#[error("host runtime refused {0}")]
	Runtime(String),
}

/// Engine error taxonomy.
///
/// [`EngineError::StaleReference`] and [`EngineError::RegistrationFailure`] are
/// recovered locally by sweeping; [`EngineError::LookupMiss`] is a logged no-op
/// on delete paths.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A tracked document or cached entity reference no longer resolves.
	#[error("stale reference: {0}")]
	StaleReference(String),

	/// A dynamic view failed to register or unregister.
	#[error("registration failure for channel {channel}: {reason}")]
	RegistrationFailure {
		/// Channel whose view failed.
		channel: ChannelId,
		/// What went wrong.
		reason: String,
	},

	/// No channel or registration matches the id.
	#[error("no channel or view with id {0}")]
	LookupMiss(ChannelId),

	/// Entity is not part of the active document's catalog.
	#[error("{0} is not a light in the active document")]
	UnknownEntity(EntityRef),

	/// Host adapter failure that is not recovered locally.
	#[error(transparent)]
	Host(#[from] HostError),

	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Errors that can occur when loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is out of range.
	#[error("invalid value for '{field}': {reason}")]
	Invalid {
		/// Offending key.
		field: &'static str,
		/// Why it was rejected.
		reason: String,
	},
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
