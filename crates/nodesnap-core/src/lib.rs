//! nodesnap-core — shared library for the nodesnap CLI.
//!
//! Provides:
//! - `cancel` — cooperative cancellation token shared by concurrent collectors
//! - `collector` — configuration collectors for kernel modules, systemd units,
//!   boot parameters and sysctl tunables
//! - `model` — collected configuration records and the aggregate snapshot
//! - `serializer` — snapshot output in JSON, YAML or table form
//! - `snapshotter` — runs all collectors concurrently and hands the result
//!   to a serializer

pub mod cancel;
pub mod collector;
pub mod model;
pub mod serializer;
pub mod snapshotter;
