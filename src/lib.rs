pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod fileserver;
pub mod manager;
pub mod recorder;
pub mod resolver;
pub mod storage;
