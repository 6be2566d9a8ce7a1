use std::fmt::{self, Write};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::level::Level;
use crate::logger::Logger;

/// Forwards `tracing` events into a shared [`Logger`].
///
/// Each event becomes one line: `target: message key=value ...`. `TRACE`
/// events are dropped.
pub struct LogLayer {
    logger: Arc<Logger>,
}

impl LogLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(level) = Level::from_tracing(metadata.level()) else {
            return;
        };
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.logger.log(&visitor.into_line(metadata.target()), level);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
}

impl EventVisitor {
    fn into_line(self, target: &str) -> String {
        format!("{target}: {}{}", self.message, self.fields)
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
