// Numan Thabit 2025
//! Library half of the demo: the concrete roster type and its config layer,
//! split out of `main.rs` so `tests/` can drive them without a subprocess.

pub mod config;
pub mod record;
