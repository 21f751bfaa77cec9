use std::fmt;

/// Append-only collector for the diagnostic lines a filter emits.
///
/// Every line is kept in order for the caller and mirrored to `tracing`
/// at DEBUG level with a `filter` field naming the emitting component.
/// Recording a line never fails and never influences the attributes a
/// filter returns.
///
/// ```
/// use attr_synth::DiagnosticLog;
///
/// let mut log = DiagnosticLog::new("limit");
/// log.debug(format_args!("Name too long: {}", "x".repeat(3)));
///
/// assert_eq!(log.filter(), "limit");
/// assert_eq!(log.lines(), ["Name too long: xxx"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLog {
    filter: &'static str,
    lines: Vec<String>,
}

impl DiagnosticLog {
    /// Creates an empty log for the named filter.
    pub fn new(filter: &'static str) -> Self {
        Self {
            filter,
            lines: Vec::new(),
        }
    }

    /// Returns the name of the filter this log belongs to.
    pub fn filter(&self) -> &'static str {
        self.filter
    }

    /// Records a debug-level diagnostic.
    pub fn debug(&mut self, args: fmt::Arguments<'_>) {
        let line = args.to_string();
        tracing::debug!(filter = self.filter, "{}", line);
        self.lines.push(line);
    }

    /// Returns the recorded lines in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the log, returning its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Returns the number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
