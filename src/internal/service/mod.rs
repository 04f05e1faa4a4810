//! Service layer: ORM-backed CRUD over the users and tasks entities.
//!
//! Services own a [`sea_orm::DatabaseConnection`] and surface domain errors
//! through [`ServiceError`]; callers (web handlers, agent tools) stay free of
//! ORM types beyond the entity models themselves.

pub mod error;
pub mod tasks;
pub mod users;

pub use error::ServiceError;
pub use tasks::{CreateTask, TaskService, UpdateTask};
pub use users::{CreateUser, UpdateUser, UserService};
