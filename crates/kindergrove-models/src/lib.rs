//! # Kindergrove Models
//!
//! Row models, typed ids, and domain vocabulary shared by the ops tooling.
//!
//! - [`ids`]: strongly-typed UUID newtypes per entity
//! - [`roles`]: RBAC rows (roles, permissions, junctions) and slug generation
//! - [`users`]: user rows and the fixed system role constants
//! - [`assessments`]: assessment config/question rows, dimensions, age bands
//! - [`todos`]: todo rows

pub mod assessments;
pub mod ids;
pub mod roles;
pub mod todos;
pub mod users;

// Re-export the ids at crate root; most call sites only need these.
pub use ids::{
    AssessmentConfigId, AssessmentQuestionId, PermissionId, RoleId, RolePermissionId, TodoId,
    UserId, UserRoleId,
};
