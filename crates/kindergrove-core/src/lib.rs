//! # Kindergrove Core
//!
//! The menu-permission catalog and the logic shared by every ops command:
//!
//! - [`menu`]: the declarative menu tree whose codes double as permission
//!   identifiers, with structural validation
//! - [`visibility`]: role slug → code-prefix rules and catalog pruning
//! - [`password`]: bcrypt hashing for operator and seeded accounts

pub mod menu;
pub mod password;
pub mod visibility;

pub use password::{hash_password, verify_password};
