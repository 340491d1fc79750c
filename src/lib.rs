pub mod cli;
pub mod clones;
pub mod config;
pub mod corpus;
pub mod error;
pub mod exit;
pub mod lines;
pub mod report;
pub mod repos;
