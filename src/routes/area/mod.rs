mod handler;
mod model;

pub use handler::{enter, leave, view};
pub use model::AreaResponse;
