pub mod classify;
pub mod provider;
pub mod record;
pub mod store;
pub mod verify;
