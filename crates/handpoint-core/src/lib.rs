pub mod client;
pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod io;
pub mod protocol;
pub mod session;
pub mod telemetry;
