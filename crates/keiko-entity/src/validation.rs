pub mod audit_log;
pub mod project_approval;
pub mod schedule_request;
