//! Process memory accounting.
//!
//! Resident set size is read from `/proc/self/statm` on Linux and gracefully
//! degrades to 0 elsewhere, the same probing pattern used for the rest of the
//! system metadata. [`PeakRss`] keeps the running maximum across a sweep.

/// Current resident set size of this process in bytes.
///
/// Returns 0 when the platform exposes no cheap RSS probe.
pub fn current_rss_bytes() -> u64 {
    #[cfg(target_os = "linux")]
    {
        read_statm_rss().unwrap_or(0)
    }
    #[cfg(not(target_os = "linux"))]
    {
        0
    }
}

/// Second field of `/proc/self/statm` is resident pages.
#[cfg(target_os = "linux")]
fn read_statm_rss() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    // SAFETY: sysconf with a valid name is always safe to call.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }
    Some(pages * page_size as u64)
}

/// Running peak RSS since sweep start; the value only moves upward.
#[derive(Debug, Clone, Copy)]
pub struct PeakRss {
    peak: u64,
}

impl PeakRss {
    /// Seed the peak with the current RSS.
    pub fn start() -> Self {
        Self {
            peak: current_rss_bytes(),
        }
    }

    /// Sample the current RSS and return the (possibly updated) peak.
    pub fn sample(&mut self) -> u64 {
        self.update(current_rss_bytes());
        self.peak
    }

    /// Peak observed so far.
    pub fn bytes(&self) -> u64 {
        self.peak
    }

    fn update(&mut self, rss: u64) {
        if rss > self.peak {
            self.peak = rss;
        }
    }
}
