pub mod access;
pub mod approval;
pub mod assignee;
pub mod audit;
pub mod batch;
pub mod config;
pub mod edges;
pub mod error;
pub mod labels;
pub mod outcome;
pub mod request;
pub mod schedule;

mod dates;
