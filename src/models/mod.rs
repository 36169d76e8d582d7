pub mod credential;
pub mod relay;
