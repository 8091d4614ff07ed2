#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
pub mod filesystem;
pub mod session;
pub mod shell;
