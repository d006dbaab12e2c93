//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod leds;
pub mod playback;
pub mod upload;

pub use button::button_task;
pub use leds::{led_task, Ws2812};
pub use playback::playback_task;
pub use upload::upload_task;
