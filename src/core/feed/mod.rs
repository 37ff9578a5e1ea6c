pub mod date;
pub mod fetcher;
pub mod normalize;
pub mod order;
pub mod present;
pub mod teams;
pub mod types;
