pub mod config;
pub mod demo;
pub mod render;
pub mod runner;
pub mod source;
