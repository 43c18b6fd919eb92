//! Settlement Service - settlements of travel services sold under a reservation.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
