pub mod app;
pub mod logging;

pub use app::{App, AppError, Config, Frame};
