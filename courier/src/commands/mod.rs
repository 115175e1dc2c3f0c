pub mod email;
pub mod messages;
pub mod migrate;
pub mod serve;
