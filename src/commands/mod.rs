pub mod fetch;
pub mod optimize;
pub mod serve;
