use slog::{o, Discard, Drain, Logger};
use slog_async::Async;
use slog_term::{CompactFormat, TermDecorator};

/// Asynchronous terminal logger in the compact format, with `prefix`
/// attached to every record.
pub fn new_logger(prefix: &str) -> Logger {
    let decorator = TermDecorator::new().build();
    let drain = CompactFormat::new(decorator).build().fuse();
    let drain = Async::new(drain).build().fuse();

    Logger::root(drain, o!("prefix" => prefix.to_string()))
}

/// Logger that drops every record.
pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}
