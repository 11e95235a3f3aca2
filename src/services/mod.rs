pub mod auth;
pub mod sequencer;
