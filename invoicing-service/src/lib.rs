//! Invoicing Service - hotel invoices and their items, with invoice totals
//! kept equal to the sum of item totals.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
