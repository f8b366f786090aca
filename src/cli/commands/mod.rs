pub mod extract;
pub mod fetch;
mod helper;
pub mod init;
pub mod push;
pub mod search;
pub mod serve;
