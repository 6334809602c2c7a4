// Résumé screening: text source → prompt → completion → validated result.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
pub mod source;
pub mod validator;
