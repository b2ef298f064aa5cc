pub mod bridge;
pub mod local;
