pub mod console_notifier;
pub mod event_bus;
pub mod memory_directory;
pub mod message_action;
pub mod multi_notifier;
pub mod name_resolver;
pub mod tokio_ticker;
pub mod webhook_notifier;
