pub mod escape;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod server;
pub mod views;

pub use server::{AppState, Server, router};
