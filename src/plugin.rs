//! Launcher-facing side of the crate.
//!
//! The launcher runs the binary once per keystroke with a JSON-RPC request
//! such as `{"method": "query", "parameters": ["search rust"]}` and expects
//! `{"result": [...]}` on stdout. [`command`] turns requests into closed
//! enums, [`handler`] executes them and [`response`] holds the wire types.

pub mod command;
pub mod handler;
pub mod response;

pub use command::{Action, Command, Request};
pub use handler::Plugin;
pub use response::{DisplayResult, Response, RpcAction};
