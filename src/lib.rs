//! Dietary Assist — a conversational helper for people with dietary restrictions.

pub mod app;
pub mod catalog;
pub mod channels;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod onboarding;
