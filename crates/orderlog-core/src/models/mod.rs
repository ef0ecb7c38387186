//! Data models for order logging.

pub mod invoice;
pub mod row;
pub mod profile;
pub mod config;
