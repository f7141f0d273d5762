//! Action processing, time, configuration, and the persistence and
//! notification boundaries for the Homestead simulation.
//!
//! The [`ActionProcessor`] owns the [`GameState`] and is the only way to
//! change it. Growth readiness is computed on read from the [`Clock`], so
//! nothing in this crate runs on a timer.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait, wall-clock and manual implementations.
//! - [`config`] -- Configuration loading from `homestead-config.yaml` into
//!   strongly-typed structs.
//! - [`notify`] -- [`NotificationSink`] trait with tracing and recording
//!   sinks.
//! - [`persistence`] -- [`Snapshot`] format and the [`PersistenceGateway`]
//!   trait, plus an in-memory gateway.
//! - [`processor`] -- The [`ActionProcessor`] command entry point.
//! - [`regen`] -- Optional lazy energy regeneration.
//! - [`rules`] -- [`GameRules`] policy constants.
//! - [`state`] -- [`GameState`], new game and bootstrap.
//! - [`view`] -- Read-only [`FarmView`] projection for display layers.
//!
//! [`Clock`]: clock::Clock
//! [`NotificationSink`]: notify::NotificationSink
//! [`Snapshot`]: persistence::Snapshot
//! [`PersistenceGateway`]: persistence::PersistenceGateway
//! [`ActionProcessor`]: processor::ActionProcessor
//! [`GameRules`]: rules::GameRules
//! [`GameState`]: state::GameState
//! [`FarmView`]: view::FarmView

pub mod clock;
pub mod config;
pub mod notify;
pub mod persistence;
pub mod processor;
pub mod regen;
pub mod rules;
pub mod state;
pub mod view;
