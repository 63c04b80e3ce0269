// Handlers module - API endpoint handlers

pub mod health;
pub mod openai;
