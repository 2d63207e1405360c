pub mod connection;
pub mod dispatcher;
pub mod notifier;

pub use dispatcher::Dispatcher;
