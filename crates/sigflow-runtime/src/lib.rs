//! `sigflow-runtime` – runs configured engine stages.
//!
//! Everything around the engine that a process needs: where settings come
//! from, where logs and spans go, and how a collaborator is bound to its
//! window settings.
//!
//! # Modules
//!
//! - [`config`] – [`EngineConfig`][config::EngineConfig]: TOML-backed window
//!   and test-signal settings with `SIGFLOW_*` environment overrides and a
//!   derived JSON schema.
//! - [`stage`] – [`TransformStage`][stage::TransformStage] and
//!   [`ConsumeStage`][stage::ConsumeStage]: run the transform or consume
//!   driver for one collaborator inside a `tracing` span, with parse warnings
//!   routed to `tracing`.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]:
//!   initialises the global `tracing` subscriber with an optional OTLP span
//!   exporter.  Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable live trace export
//!   to Jaeger, Grafana Tempo, or any OTLP-compatible collector.

pub mod config;
pub mod stage;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig, SignalConfig, WindowConfig, Waveform};
pub use stage::{ConsumeStage, TransformStage};
