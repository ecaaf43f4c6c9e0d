pub mod attendance;
pub mod homework;
pub mod learner;
pub mod session;

mod mutation;
mod query;

pub use mutation::*;
pub use query::*;
