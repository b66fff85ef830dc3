// Library interface for climbwire modules
// This allows tests and other binaries to import modules

pub mod crawler;
pub mod extract;
pub mod feed;
pub mod llm;
pub mod localize;
pub mod page;
