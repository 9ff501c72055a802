//! Payment reminder delivery.

mod logging_notifier;

pub use logging_notifier::LoggingReminderNotifier;
