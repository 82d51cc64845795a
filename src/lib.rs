//! Procurement Risk - Regulatory risk classification for procured systems
//!
//! This crate derives, from questionnaire answers about a system being
//! procured, whether a DPIA is required, its MDR device class, its AI Act
//! tier, the sensitivity of its interfaces, a supplier security score, a
//! pre-assessment checklist of applicable regulatory families and one
//! overall risk class.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
