pub mod account;
pub mod memory;
