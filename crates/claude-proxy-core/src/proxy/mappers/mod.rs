// Mapper module
// Handles OpenAI ↔ Claude protocol conversion

pub mod openai;
