pub mod area;
pub mod health;
pub mod session;
