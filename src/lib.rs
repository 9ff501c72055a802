//! Client Billing - subscription billing and payment reconciliation
//!
//! This crate tracks clients, their MercadoPago subscriptions, payments and
//! invoices, and reconciles overdue accounts on a daily schedule.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
