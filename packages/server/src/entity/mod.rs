pub mod account;
pub mod asset;
pub mod session;
