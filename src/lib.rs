// src/lib.rs

#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod portal;
pub mod specs;

pub mod analysis;
pub mod collect;
pub mod data;
pub mod file;
pub mod gui;
pub mod presenter;
pub mod progress;
pub mod store;
pub mod webdriver;
