//! fin - a personal finance dashboard backend
//!
//! This crate provides the core functionality for the `fin` CLI tool.
//!
//! # Architecture
//!
//! - [`actions`] - User-scoped dashboard operations
//! - [`advice`] - AI completion providers, prompts and reply parsing
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Profile, Budget, Transaction, SavingsGoal, Subscription, Alert)
//! - [`storage`] - SQLite database layer
//! - [`summary`] - Budget, goal and category aggregation
//! - [`session`] / [`views`] - Identity and cache-invalidation seams
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod advice;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod storage;
pub mod summary;
pub mod views;

pub use error::{ActionResult, Error, Result, Success};
