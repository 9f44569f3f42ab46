//! Measurement kernel.
//!
//! Times exactly one engine invocation with the monotonic wall clock and
//! aggregates repeated samples with the median. The kernel carries no
//! cold/warm state: sequencing one cold call before the warm calls is the
//! sweep orchestrator's job, and a fault from the measured operation
//! propagates unmodified.

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Monotonic timer for one measured invocation.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Start a new timer.
    #[inline]
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds elapsed since [`Timer::start`].
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1e3
    }
}

/// Output of a timed operation together with its wall time.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    /// Whatever the operation returned.
    pub value: T,
    /// Wall time of the invocation alone, in milliseconds.
    pub elapsed_ms: f64,
}

/// Run one fallible operation with the timer wrapped tightly around it.
///
/// Input generation must happen before this call so generator cost never
/// leaks into the measurement. No retries: an `Err` from the operation is
/// returned as-is and the elapsed time is discarded.
pub fn run_timed<T, E>(op: impl FnOnce() -> Result<T, E>) -> Result<Timed<T>, E> {
    let timer = Timer::start();
    let value = op()?;
    let elapsed_ms = timer.elapsed_ms();
    Ok(Timed { value, elapsed_ms })
}

// ─── Median ──────────────────────────────────────────────────────────────────

/// Median of a sample set.
///
/// Sorts ascending; odd counts take the middle element, even counts the mean
/// of the two central elements, and a single sample is returned unchanged.
/// An empty slice yields 0.0.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_count_takes_middle() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn median_even_count_averages_center() {
        assert_eq!(median(&[4.0, 1.0]), 2.5);
    }

    #[test]
    fn median_single_sample_is_identity() {
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn median_empty_is_zero() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn run_timed_measures_only_the_call() {
        let timed = run_timed(|| -> Result<u32, ()> {
            std::thread::sleep(std::time::Duration::from_millis(10));
            Ok(42)
        })
        .unwrap();
        assert_eq!(timed.value, 42);
        assert!(timed.elapsed_ms >= 5.0);
        assert!(timed.elapsed_ms < 1_000.0);
    }

    #[test]
    fn run_timed_propagates_errors_unmodified() {
        let result: Result<Timed<()>, &str> = run_timed(|| Err("engine fault"));
        assert_eq!(result.unwrap_err(), "engine fault");
    }
}
