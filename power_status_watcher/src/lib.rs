pub mod clock;
pub mod configuration;
pub mod controller;
pub mod display;
pub mod refresh;
pub mod session;
