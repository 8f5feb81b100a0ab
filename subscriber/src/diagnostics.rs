use crate::event::TransportError;
use log::*;

/// Label written with every transport failure.
pub const TRANSPORT_FAILURE_LABEL: &str = "EventSource failed:";

/// Operator-visible sink for transport failures.
pub trait Diagnostics {
    fn record(&mut self, label: &str, error: &TransportError);
}

/// Writes diagnostics through the `log` facade at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn record(&mut self, label: &str, error: &TransportError) {
        error!("{label} {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    /// Keeps every record emitted in this test binary.
    struct CapturingLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CapturingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        records: Mutex::new(Vec::new()),
    };

    #[test]
    fn test_log_diagnostics_emits_one_labelled_error() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);

        let error = TransportError::new("connection refused by 127.0.0.1:1");
        LogDiagnostics.record(TRANSPORT_FAILURE_LABEL, &error);

        let records = LOGGER.records.lock().unwrap();
        let matching: Vec<_> = records
            .iter()
            .filter(|(_, message)| message.contains("127.0.0.1:1"))
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].0, Level::Error);
        assert_eq!(
            matching[0].1,
            "EventSource failed: connection refused by 127.0.0.1:1"
        );
    }
}
