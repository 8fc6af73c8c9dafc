//! LLM modules for trend and insight generation.
//!
//! This module provides the chat completion client and the two generation
//! requests built on top of it.

pub mod client;
pub mod generator;

pub use client::{ChatClient, OpenAiClient, OpenAiConfig};
pub use generator::{generate_insights, generate_trends, GenerationSettings};

#[cfg(test)]
pub(crate) mod testing;
