// Award discovery: asks the model for a player's awards through a chain of
// strategies, normalizes and dedupes what comes back, and persists the winners.
// All model calls go through llm_client capability traits.

pub mod dedup;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod prompts;
pub mod scoring;
pub mod store;
pub mod strategies;
pub mod text_parser;
pub mod thumbnails;
pub mod verify;
