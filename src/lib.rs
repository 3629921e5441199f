//! Half-month staff roster engine
//!
//! This crate models a staff-by-day roster for a period running from the 16th
//! of one month to the 15th of the next, and checks it against coverage and
//! fairness policies: consecutive rest across periods, understaffing, manager
//! coverage, novice protection, overwork, leader assignment and equity.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rules;
pub mod storage;
