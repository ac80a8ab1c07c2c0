//! Container lifecycle management for the minidock runtime.
//!
//! The launcher ([`process`]) builds an isolated child re-invoking this
//! binary in the init role; the bootstrapper ([`init`]) runs as the first
//! process inside the new namespaces, reads the user command from an
//! inherited pipe, and execs it; the orchestrator ([`container`])
//! sequences launch, cgroup limiting, command handoff, and teardown.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod container;
pub mod init;
pub mod logs;
pub mod process;
pub mod state;
