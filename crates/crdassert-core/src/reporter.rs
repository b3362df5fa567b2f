//! Reporting sinks for schema violations
//!
//! A check never fails a test by itself: violations are handed to a
//! [`Reporter`] and the caller decides what a failure means. Setup problems
//! (unknown kinds, broken CRDs) are returned as errors instead and never
//! reach a reporter.

/// Receives one formatted message per resource that violates its schema
pub trait Reporter {
    fn report(&mut self, message: String);
}

impl Reporter for Vec<String> {
    fn report(&mut self, message: String) {
        self.push(message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, message: String) {
        (**self).report(message);
    }
}

/// Adapter turning a closure into a [`Reporter`]
pub struct FnReporter<F>(pub F);

impl<F: FnMut(String)> Reporter for FnReporter<F> {
    fn report(&mut self, message: String) {
        (self.0)(message);
    }
}

/// Records failures and fails the test once, at the end.
///
/// ```ignore
/// let mut collector = Collector::new();
/// asserter.check_files(&mut collector, &paths)?;
/// collector.assert_passed();
/// ```
#[derive(Debug, Default, Clone)]
pub struct Collector {
    messages: Vec<String>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_failed(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// Panic with every recorded message if anything was reported
    #[track_caller]
    pub fn assert_passed(&self) {
        if self.is_failed() {
            panic!(
                "{} resource(s) failed CRD validation:\n\n{}",
                self.messages.len(),
                self.messages.join("\n\n")
            );
        }
    }
}

impl Reporter for Collector {
    fn report(&mut self, message: String) {
        self.messages.push(message);
    }
}
