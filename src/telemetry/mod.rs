//! Telemetry hooks.
//!
//! Observers are injected into the `ActionProcessor` and see every executed
//! action, successful or not. Nothing in the engine depends on an observer
//! being present.
//!
//! ## Key Types
//!
//! - `GameObserver`: the hook trait (all methods default to no-ops)
//! - `NoopObserver`: ignores everything
//! - `RecordingObserver`: keeps every record in memory, for tests and replays

pub mod observer;

pub use observer::{GameObserver, NoopObserver, RecordingObserver};
