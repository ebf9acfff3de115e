pub mod agent;
pub mod gemini;
pub mod tailor;
