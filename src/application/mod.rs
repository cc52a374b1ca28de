pub mod builder;
pub mod cooldown;
pub mod guard;
pub mod platform;
pub mod ports;
pub mod refresh;
pub mod strategies;
pub mod usecases;

pub use builder::*;
pub use cooldown::*;
pub use guard::*;
pub use platform::*;
pub use ports::*;
pub use refresh::*;
pub use strategies::*;
