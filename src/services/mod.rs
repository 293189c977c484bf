pub mod gateway_client;
pub mod med42;
