pub mod action;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod index_set;
pub mod match_builder;
pub mod match_stats;
pub mod ranking;
pub mod report;
pub mod scoring;
pub mod segment;
pub mod store;
pub mod team_stats;
