//! IRL Games API - catalog of real-life games with threaded player feedback
//!
//! This crate provides:
//! - A public catalog of games grouped by category
//! - Comment trees with one level of replies and optional 1-10 ratings
//! - Per-game feedback statistics and bulk actions for curators
//! - A ledger of the addresses authenticated users connect from

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;
