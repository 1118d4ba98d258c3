/// ProgressReporter port for reporting progress during operations
///
/// The use case calls this observer at fixed points of the pipeline (start
/// of resolution, package counts, filter results, warnings, metadata
/// progress, completion). Core services never print; they return warnings
/// as values and the use case forwards them here.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress with a position
    ///
    /// # Arguments
    /// * `current` - Current progress value
    /// * `total` - Total expected value
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a recoverable problem; the scan continues
    fn report_warning(&self, message: &str);

    /// Reports an error message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
