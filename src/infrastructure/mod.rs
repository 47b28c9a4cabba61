pub mod config;
pub mod installer;
pub mod remote;
