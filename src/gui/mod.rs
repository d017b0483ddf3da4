mod app;
mod message;
mod widgets;

pub use app::{DetectViewApp, run};
pub use message::Message;
