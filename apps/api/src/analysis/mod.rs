// CV Analysis Engine
// Implements: document sanitizing, prompt building, section scoring,
// response extraction, and the sequential three-section pipeline.
// All generation calls go through llm_client — no direct Gemini calls here.

pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod sanitize;
pub mod scoring;
