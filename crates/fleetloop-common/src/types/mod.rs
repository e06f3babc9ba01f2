//! Core domain types for Fleetloop
pub mod entity;
pub mod objective;
pub mod primitive;
pub mod qos;
pub mod staging;
