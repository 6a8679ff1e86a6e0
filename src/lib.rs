//! Astro Guru - chat client for astrologer personas
//!
//! A client-side chat session state machine and its backend API contract,
//! with a persona catalog and a small terminal front-end on top.

pub mod api;
pub mod app;
pub mod config;
pub mod persona;
pub mod runtime;
pub mod state_machine;
