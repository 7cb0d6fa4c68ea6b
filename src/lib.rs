//! sysglance — terminal dashboard for host telemetry
//!
//! The reusable core is the concurrent snapshot collector in [`core`]:
//! named probes fan out concurrently each cycle, failures and timeouts stay
//! isolated per probe, and results are joined in registration order into an
//! immutable snapshot that the scheduler publishes atomically.

pub mod app;
pub mod cli;
pub mod core;
pub mod probes;
pub mod screens;
pub mod utils;
