mod handler;
mod model;

pub use handler::{current, landing, login, logout};
pub use model::{AreaLink, LandingResponse, LoginRequest, LoginResponse, SessionResponse};
