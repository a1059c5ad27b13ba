//! Sibyl - LLM provider resolution and client construction for self-hosted
//! chat and QA assistants.
//!
//! Higher-level pipelines ask for an LLM client; this crate decides which
//! configured provider backs it (per-call override, persona override, or the
//! stored default) and hands back a client bound to that provider's
//! connection parameters.

pub mod config;
pub mod llm;
pub mod persona;
pub mod store;
