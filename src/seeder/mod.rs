//! Database seeding for demo and assessment data.
//!
//! Every seeder follows the same shape: generate rows in memory, insert them
//! in chunked multi-row statements inside one transaction, and print progress
//! as it goes. Demo accounts carry a marker email domain so clearing can
//! never touch operator-created data.

pub mod assessments;
pub mod models;
pub mod parents;
pub mod todos;

/// Email domain stamped on every seeded account. `clear` keys on this.
pub const SEED_EMAIL_DOMAIN: &str = "seed.kindergrove.test";

/// Password given to every seeded account unless overridden on the CLI.
pub const DEFAULT_SEED_PASSWORD: &str = "Kindergrove123!";
