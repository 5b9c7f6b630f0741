// Library root
// -----------
// This crate exposes the front-end for a face-authentication backend. The
// binary (`main.rs`) wires these modules into the `bioid` CLI.
//
// Module responsibilities:
// - `mode`: the two interaction modes and what differs between them.
// - `view`: presentation state, notices, and the `Surface` trait that
//   draws them.
// - `controller`: owns the mode and runs the verify/enroll action.
// - `api`: HTTP interactions with the backend (verify, register, status,
//   activity) behind the `AuthBackend` trait.
// - `session`: keeps the backend session cookie between runs.
// - `ui`: terminal surface, interactive menu and one-shot command output.
// - `cli`, `telemetry`, `error`: flags, logging setup, typed API errors.
//
// The controller only talks to `AuthBackend` and `Surface`, so it runs the
// same against the real backend, a terminal, or test doubles.
pub mod api;
pub mod cli;
pub mod controller;
pub mod error;
pub mod mode;
pub mod session;
pub mod telemetry;
pub mod ui;
pub mod view;
