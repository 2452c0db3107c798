pub mod behavior;
pub mod config;
pub mod detect;
pub mod monitor;
pub mod offsets;
pub mod pose;
pub mod posture;
pub mod region;
pub mod render;
pub mod safety;
pub mod sop;
