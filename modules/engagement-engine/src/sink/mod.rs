pub mod backend;
pub mod fanout;
pub mod log;
pub mod noop;
pub mod table;
pub mod webhook;

pub use backend::EngagementSink;
pub use fanout::FanoutSink;
pub use self::log::LogSink;
pub use noop::NoopSink;
pub use table::TableSink;
pub use webhook::WebhookSink;
