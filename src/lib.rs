//! Assigns delivery drivers to customer orders and ranks drivers by distance driven.
//!
//! The core is [`services::AssignmentService`], which works against any
//! [`repository::Store`] backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod models;
pub mod repository;
pub mod services;

pub use error::{AssignmentError, StoreError};
pub use services::AssignmentService;
