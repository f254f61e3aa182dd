//! Shoebox Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
