pub mod audio;
pub mod orchestrator;
pub mod resolver;
pub mod tts;

#[cfg(test)]
pub(crate) mod mock;
