pub mod difference;
pub mod duration_text;
pub mod event;
pub mod expiry;
pub mod subject;

pub use difference::*;
pub use duration_text::*;
pub use event::*;
pub use expiry::*;
pub use subject::*;
