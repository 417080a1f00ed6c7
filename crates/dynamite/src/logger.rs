//! Per-instance loggers.

use tracing::Span;

/// Logger name for a table instance: `dynamite.<instance>`.
pub fn logger_name(instance: &str) -> String {
    format!("dynamite.{}", instance)
}

/// A `tracing` span dedicated to one item manager.
#[derive(Debug, Clone)]
pub(crate) struct InstanceLogger {
    name: String,
    span: Span,
}

impl InstanceLogger {
    pub(crate) fn new(instance: &str) -> Self {
        let name = logger_name(instance);
        let span = tracing::info_span!("item_manager", logger = %name);
        Self { name, span }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_name() {
        assert_eq!(logger_name("users"), "dynamite.users");
        assert_eq!(InstanceLogger::new("orders").name(), "dynamite.orders");
    }
}
