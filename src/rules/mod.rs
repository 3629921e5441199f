//! Scheduling policy rules.
//!
//! This module contains one checker per policy: cross-period consecutive rest,
//! understaffing, manager coverage, novice protection, no-wish overwork, leader
//! eligibility, weekend equity and leader equity. Each checker is a pure
//! function over a grid snapshot; [`RuleEngine`] runs them all and orders the
//! findings.

mod consecutive_rest;
mod engine;
mod equity;
mod leader_eligibility;
mod leader_equity;
mod manager_coverage;
mod novice_protection;
mod overwork;
mod understaffing;
mod weekend_equity;

pub use consecutive_rest::check_consecutive_rest;
pub use engine::RuleEngine;
pub use equity::{EquityOutlier, equity_outliers};
pub use leader_eligibility::check_leader_eligibility;
pub use leader_equity::check_leader_equity;
pub use manager_coverage::check_manager_coverage;
pub use novice_protection::check_novice_protection;
pub use overwork::check_no_wish_overwork;
pub use understaffing::check_understaffing;
pub use weekend_equity::check_weekend_equity;
