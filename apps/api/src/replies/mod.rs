// Review reply generation: load profile + review, build the prompt,
// call the completion client, persist the reply on a best-effort basis.
// All model calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
