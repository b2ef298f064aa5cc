pub mod api;
pub(crate) mod hash;
pub(crate) mod os;
pub mod stores;
pub mod types;
