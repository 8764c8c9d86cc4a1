//! Bridge relayer binary.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | CLI flags and JSON chain configuration |
//! | [`signal`] | Graceful shutdown on `SIGTERM`/`SIGINT`/`SIGHUP`/`SIGQUIT` |
//! | [`metrics`] | Prometheus sink for [`bridge_core::RelayMetrics`] |
//! | [`health`] | `/healthz` and `/metrics` HTTP endpoints |
//! | [`run`] | Wires configuration into a running relay engine |

pub mod config;
pub mod health;
pub mod metrics;
pub mod run;
pub mod signal;

pub use run::run;
