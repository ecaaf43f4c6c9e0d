pub mod audit;
pub mod project_approval;
pub mod schedule_request;
