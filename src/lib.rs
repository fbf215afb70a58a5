// ABOUTME: Main library entry point for the fitlog conversational fitness API
// ABOUTME: Wires configuration, persistence, LLM extraction, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

#![deny(unsafe_code)]

//! # Fitlog Server
//!
//! A conversational fitness-tracking API. Users describe workouts, meals, and
//! body metrics in natural language; a hosted language model extracts typed
//! records which are persisted per user and served back as ranged slices plus
//! derived dashboard statistics.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` persistence with per-domain managers
//! - **LLM**: `OpenAI`-compatible chat-completions client in JSON mode
//! - **Extraction**: free text to schema-validated entries and plan requests
//! - **Plans**: two-step structured-then-rendered plan generation
//! - **Routes**: axum handlers for chat, entries, plans, profile, dashboard
//!
//! ## Example
//!
//! ```rust,no_run
//! use fitlog_server::config::ServerConfig;
//! use fitlog_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("fitlog configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication token validation and issuance
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Derived dashboard statistics (weight deltas, calorie averages, volume)
pub mod dashboard;

/// `SQLite` persistence layer with per-domain managers
pub mod database;

/// Unified error handling with standard codes and HTTP responses
pub mod errors;

/// Natural-language-to-structured-record extraction
pub mod extraction;

/// LLM provider abstraction and `OpenAI`-compatible client
pub mod llm;

/// Common data models for fitness records and chat payloads
pub mod models;

/// Multi-day plan generation (structured object plus conversational summary)
pub mod plans;

/// Shared per-process dependency container for request handlers
pub mod resources;

/// HTTP routes for chat, entries, plans, profile, and dashboard
pub mod routes;
