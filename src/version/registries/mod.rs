//! Registry implementations for querying chart versions

pub mod helm;

pub use helm::HelmCli;
