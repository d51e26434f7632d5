pub mod init;
pub mod level;
pub mod script;
