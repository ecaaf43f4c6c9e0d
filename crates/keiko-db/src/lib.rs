pub mod batch;
pub mod sequence;
pub mod training_request;
pub mod util;
pub mod validation;

pub use sea_orm;
