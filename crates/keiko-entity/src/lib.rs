pub mod batch;
pub mod sequence_counter;
pub mod training_request;
pub mod validation;
