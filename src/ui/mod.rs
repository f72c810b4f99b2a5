pub mod components;
pub mod controller;
pub mod monitor_list;

pub use controller::Controller;
