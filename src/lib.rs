//! # Kindergrove Ops
//!
//! Maintenance, seeding, and diagnostic tooling for the Kindergrove
//! database. The binary exposes one subcommand per job; this library crate
//! exists so the planning logic can be unit tested.

pub mod commands;
pub mod logging;
pub mod seeder;
