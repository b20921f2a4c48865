// Export our modules for use in the binary and tests
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod headless;
