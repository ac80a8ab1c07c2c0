//! # minidock-core
//!
//! Low-level Linux isolation primitives for the minidock runtime.
//!
//! This crate provides safe abstractions over:
//! - **Cgroups v1**: per-controller subsystems (memory, cpu, cpuset) behind
//!   a shared capability trait, fanned out by a [`cgroup::CgroupManager`].
//! - **Filesystem**: overlay-mounted container workspaces with an optional
//!   host-directory volume, built and torn down in a strict order.
//! - **Images**: tar archive extraction for the shared lower layer and
//!   packaging of a container's merged view.

pub mod cgroup;
pub mod filesystem;
pub mod image;
