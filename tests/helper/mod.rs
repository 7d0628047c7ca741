//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod archive;
pub mod index;
#[cfg(unix)]
pub mod python;

pub use archive::{tar_gz, zip_archive};
pub use index::{FakeIndex, Release};
#[cfg(unix)]
pub use python::fake_python;
