#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Registry and synchronization engine for scene light desks.
//!
//! The engine lets a user bind lights from a host application's scene graph to
//! persistent control surfaces ("channels"), and keeps four things consistent
//! while the host fires lifecycle signals at arbitrary times:
//!
//! - the catalog of lights in the active document,
//! - the per-document channel bindings,
//! - the live host view registrations mirroring those channels,
//! - the identity of the active document.
//!
//! # Execution model
//!
//! Everything that mutates channels or views is a [`Task`] on a FIFO queue.
//! The host calls [`Engine::tick`] from one recurring timer; signals
//! ([`Engine::handle_signal`]) and commands ([`Engine::invoke`]) only enqueue.
//! A consistency sweep tears down channels whose light or view went missing,
//! which is the single recovery path for stale references and failed
//! registrations.
//!
//! # Host integration
//!
//! Implement [`SceneGraph`], [`PresentationLayer`] and [`HostRuntime`] for the
//! application, then:
//!
//! ```ignore
//! let mut engine = Engine::new(EngineConfig::load(path)?);
//! engine.activate(&mut host)?;
//!
//! // from the host's lifecycle callbacks:
//! engine.handle_signal(&host, LifecycleSignal::PostSwitch);
//!
//! // from the host's timer:
//! let directive = engine.tick(&mut host);
//! ```

pub mod catalog;
pub mod channels;
pub mod commands;
pub mod config;
mod engine;
pub mod error;
#[cfg(test)]
mod fixture;
pub mod host;
pub mod persist;
pub mod queue;
pub mod signals;
pub mod sweep;
pub mod tracker;
pub mod types;
pub mod views;

pub use catalog::{FilterState, LightCatalog, Selection};
pub use channels::{AssignOutcome, ChannelRegistry};
pub use commands::{Command, CommandStatus, DebugReport};
pub use config::EngineConfig;
pub use engine::{DocumentState, DrainReport, Engine, Phase, STARTUP_SEQUENCE, TickDirective};
pub use error::{ConfigError, EngineError, HostError, Result};
pub use host::{Host, HostRuntime, PresentationLayer, SceneGraph};
pub use persist::PersistedDocument;
pub use queue::{Task, TaskQueue, TaskScope};
pub use signals::{LifecycleSignal, SignalKind};
pub use sweep::{OrphanReason, SweepPlan};
pub use tracker::SceneTracker;
pub use types::{Channel, ChannelId, DocumentId, EntityRef, LightEntity, LightKind};
pub use views::{PrefixedViewFactory, ViewFactory, ViewRegistry, ViewSpec};
