pub mod cli;
pub mod config;
pub mod files;
pub mod log;
pub mod misc;
pub mod validator;
