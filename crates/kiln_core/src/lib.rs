pub mod context;
pub mod hash;
pub mod store;
