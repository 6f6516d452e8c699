// Mock interview flow: question generation, answer evaluation, pages and handlers.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod evaluation;
pub mod handlers;
pub mod pages;
pub mod prompts;
pub mod questions;
