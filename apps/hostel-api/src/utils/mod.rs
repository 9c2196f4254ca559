mod response;
mod validation;

pub use response::*;
pub use validation::*;
