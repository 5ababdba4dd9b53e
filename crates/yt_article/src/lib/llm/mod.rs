pub mod composer;
pub mod generator;
pub mod openai;
