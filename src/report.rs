//! Report rendering.
//!
//! Pure `String`-returning renderers for everything the drivers print: the
//! banner, the device block, incremental per-config lines, and the final
//! aligned summary tables with their derived statistic (best throughput for
//! batch axes, mean latency for the query axis). Every renderer is correct
//! for zero, one, or many results.
//!
//! Formatting policy: milliseconds at zero decimals, throughput at one
//! decimal, byte sizes auto-scaled to KB/MB/GB.

use chrono::{DateTime, Utc};

use crate::engine::DeviceInfo;
use crate::sweep::{BenchConfig, Outcome, SweepItem};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Auto-scaled byte count: KB and MB at one decimal, GB at two.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    let b = bytes as f64;
    if b < MIB {
        format!("{:.1} KB", b / KIB)
    } else if b < GIB {
        format!("{:.1} MB", b / MIB)
    } else {
        format!("{:.2} GB", b / GIB)
    }
}

/// Boxed title banner.
pub fn render_banner(title: &str) -> String {
    format!("{RULE}\n  {title}\n{RULE}\n")
}

/// Device block: accelerator, device list, accelerator memory, CPU cores,
/// starting RSS and run timestamp.
pub fn render_device(info: &DeviceInfo, start_rss: u64, started: DateTime<Utc>) -> String {
    let mut out = String::from("System\n");
    out.push_str(&format!(
        "  Device:    {}\n",
        info.accelerator.as_deref().unwrap_or("cpu")
    ));
    if !info.accel_devices.is_empty() {
        out.push_str(&format!("  GPU:       {}\n", info.accel_devices.join(", ")));
    }
    if let Some(mem) = info.accel_memory {
        out.push_str(&format!(
            "  VRAM:      {} total, {} free\n",
            format_bytes(mem.total),
            format_bytes(mem.free)
        ));
    }
    out.push_str(&format!("  CPU cores: {} math\n", info.cpu_cores));
    out.push_str(&format!("  RSS:       {} at start\n", format_bytes(start_rss)));
    out.push_str(&format!(
        "  Started:   {}\n",
        started.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

// ─── Incremental lines ───────────────────────────────────────────────────────

/// Progress prefix written (and flushed) before a config's cold run.
pub fn render_progress(config: &BenchConfig, axis: &str) -> String {
    match config {
        BenchConfig::Batch(n) => format!("  [{axis}={n:>3}] "),
        BenchConfig::Query { label, .. } => format!("  [{label:<8}] "),
    }
}

/// Non-fatal warning for an under-delivering operation.
pub fn render_shortfall(outcome: &Outcome, delivered: usize, requested: usize) -> String {
    match outcome {
        Outcome::Embedded { .. } => {
            format!("WARNING: only {delivered}/{requested} embeddings succeeded")
        }
        _ => format!("WARNING: got {delivered}/{requested} results"),
    }
}

/// Result line written as each config completes, before the sweep finishes.
pub fn render_result_line(item: &SweepItem) -> String {
    let mut line = format!(
        "cold {:>5.0}ms  warm {:>5.0}ms",
        item.cold_ms, item.warm_ms
    );
    match &item.outcome {
        Outcome::Embedded { .. } | Outcome::Reranked { .. } => {
            if let Some(tps) = item.warm_throughput() {
                line.push_str(&format!("  {:>7.1} {}", tps, unit_for(&item.outcome)));
            }
            line.push_str(&format!("  RSS {}", format_bytes(item.peak_rss_bytes)));
        }
        Outcome::Expanded { total, breakdown } => {
            line.push_str(&format!("  {total:>2} results  [{breakdown}]"));
        }
    }
    line
}

fn unit_for(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Embedded { .. } => "texts/s",
        Outcome::Reranked { .. } => "docs/s",
        Outcome::Expanded { .. } => "results",
    }
}

// ─── Summary tables ──────────────────────────────────────────────────────────

/// Final table for a batch-size axis, plus a speedup column relative to the
/// first row and a "Best:" line when more than one result exists.
///
/// `axis` is the column header ("Batch", "Docs"); `unit` the throughput
/// header ("Texts/s", "Docs/s").
pub fn render_batch_summary(items: &[SweepItem], axis: &str, unit: &str) -> String {
    let mut out = render_banner("Results");
    out.push('\n');
    out.push_str(&format!(
        "  {axis:>5}    Cold      Warm   {unit:>7}   Peak RSS\n"
    ));
    out.push_str("  ─────  ──────    ──────   ───────   ────────\n");

    let baseline = items.first().and_then(SweepItem::warm_throughput);
    for (i, item) in items.iter().enumerate() {
        let tps = item.warm_throughput().unwrap_or(0.0);
        let speedup = match baseline {
            Some(base) if i > 0 && base > 0.0 => format!("  ({:.1}x)", tps / base),
            _ => String::new(),
        };
        out.push_str(&format!(
            "  {:>5}  {:>5.0}ms  {:>5.0}ms  {:>7.1}  {:>9}{}\n",
            item.config.batch_size().unwrap_or_default(),
            item.cold_ms,
            item.warm_ms,
            tps,
            format_bytes(item.peak_rss_bytes),
            speedup
        ));
    }

    if items.len() > 1 {
        if let Some(best) = items.iter().max_by(|a, b| {
            let a = a.warm_throughput().unwrap_or(0.0);
            let b = b.warm_throughput().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        }) {
            out.push_str(&format!(
                "\n  Best: {}={}, {:.1} {}\n",
                axis.to_lowercase(),
                best.config.batch_size().unwrap_or_default(),
                best.warm_throughput().unwrap_or(0.0),
                unit.to_lowercase()
            ));
        }
    }
    out
}

/// Final table for the query axis, plus mean cold/warm latency across all
/// measured queries.
pub fn render_query_summary(items: &[SweepItem]) -> String {
    let mut out = render_banner("Results");
    out.push('\n');
    out.push_str("  Type        Cold      Warm  Results  Breakdown         Peak RSS\n");
    out.push_str("  ────────  ──────    ──────  ───────  ────────────────  ────────\n");

    for item in items {
        let label = match &item.config {
            BenchConfig::Query { label, .. } => label.as_str(),
            BenchConfig::Batch(_) => "",
        };
        let (total, breakdown) = match &item.outcome {
            Outcome::Expanded { total, breakdown } => (*total, breakdown.to_string()),
            _ => (0, String::new()),
        };
        out.push_str(&format!(
            "  {:<8}  {:>5.0}ms  {:>5.0}ms  {:>7}  {:<16}  {:>8}\n",
            label,
            item.cold_ms,
            item.warm_ms,
            total,
            breakdown,
            format_bytes(item.peak_rss_bytes)
        ));
    }

    if !items.is_empty() {
        let n = items.len() as f64;
        let mean_cold: f64 = items.iter().map(|r| r.cold_ms).sum::<f64>() / n;
        let mean_warm: f64 = items.iter().map(|r| r.warm_ms).sum::<f64>() / n;
        out.push_str(&format!(
            "\n  Average: cold {mean_cold:.0}ms, warm {mean_warm:.0}ms per query\n"
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::ExpansionBreakdown;

    fn batch_item(n: usize, cold_ms: f64, warm_ms: f64, peak: u64) -> SweepItem {
        SweepItem {
            config: BenchConfig::Batch(n),
            cold_ms,
            warm_ms,
            peak_rss_bytes: peak,
            outcome: Outcome::Embedded {
                requested: n,
                valid: n,
            },
        }
    }

    fn query_item(label: &str, cold_ms: f64, warm_ms: f64) -> SweepItem {
        SweepItem {
            config: BenchConfig::Query {
                label: label.to_string(),
                text: String::new(),
            },
            cold_ms,
            warm_ms,
            peak_rss_bytes: 1024,
            outcome: Outcome::Expanded {
                total: 4,
                breakdown: ExpansionBreakdown {
                    lex: 2,
                    vec: 1,
                    hyde: 1,
                },
            },
        }
    }

    #[test]
    fn bytes_scale_to_kb_mb_gb() {
        assert_eq!(format_bytes(512), "0.5 KB");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(1536 * 1024), "1.5 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.50 GB");
    }

    #[test]
    fn device_block_renders_cpu_only_snapshot() {
        let info = DeviceInfo {
            accelerator: None,
            accel_devices: Vec::new(),
            accel_memory: None,
            cpu_cores: 8,
        };
        let block = render_device(&info, 2048, Utc::now());
        assert!(block.contains("Device:    cpu"));
        assert!(block.contains("CPU cores: 8 math"));
        assert!(block.contains("RSS:       2.0 KB at start"));
        assert!(!block.contains("VRAM"));
    }

    #[test]
    fn device_block_renders_accelerator_details() {
        let info = DeviceInfo {
            accelerator: Some("cuda".to_string()),
            accel_devices: vec!["RTX 4090".to_string()],
            accel_memory: Some(crate::engine::MemoryInfo {
                total: 24 * 1024 * 1024 * 1024,
                free: 20 * 1024 * 1024 * 1024,
            }),
            cpu_cores: 16,
        };
        let block = render_device(&info, 0, Utc::now());
        assert!(block.contains("Device:    cuda"));
        assert!(block.contains("GPU:       RTX 4090"));
        assert!(block.contains("VRAM:      24.00 GB total, 20.00 GB free"));
    }

    #[test]
    fn progress_prefix_pads_batch_and_label() {
        assert_eq!(
            render_progress(&BenchConfig::Batch(5), "batch"),
            "  [batch=  5] "
        );
        let query = BenchConfig::Query {
            label: "short".to_string(),
            text: String::new(),
        };
        assert_eq!(render_progress(&query, "query"), "  [short   ] ");
    }

    #[test]
    fn batch_summary_handles_zero_results() {
        let out = render_batch_summary(&[], "Batch", "Texts/s");
        assert!(out.contains("Results"));
        assert!(out.contains("Texts/s"));
        assert!(!out.contains("Best:"));
    }

    #[test]
    fn batch_summary_single_result_has_no_best_line() {
        let out = render_batch_summary(&[batch_item(10, 100.0, 50.0, 1024)], "Batch", "Texts/s");
        assert!(out.contains("200.0")); // 10 / 50ms * 1000
        assert!(!out.contains("Best:"));
        assert!(!out.contains("x)"));
    }

    #[test]
    fn batch_summary_picks_best_throughput() {
        let items = vec![
            batch_item(1, 100.0, 100.0, 1024),
            batch_item(10, 100.0, 100.0, 2048),
            batch_item(50, 1000.0, 1000.0, 4096),
        ];
        let out = render_batch_summary(&items, "Batch", "Texts/s");
        // 10/100*1000 = 100.0 texts/s beats 10.0 and 50.0.
        assert!(out.contains("Best: batch=10, 100.0 texts/s"));
        // Speedup vs the first row.
        assert!(out.contains("(10.0x)"));
    }

    #[test]
    fn query_summary_handles_zero_results() {
        let out = render_query_summary(&[]);
        assert!(out.contains("Breakdown"));
        assert!(!out.contains("Average:"));
    }

    #[test]
    fn query_summary_reports_mean_latency() {
        let items = vec![query_item("short", 100.0, 40.0), query_item("code", 200.0, 60.0)];
        let out = render_query_summary(&items);
        assert!(out.contains("Average: cold 150ms, warm 50ms per query"));
        assert!(out.contains("lex:2 vec:1 hyde:1"));
    }
}
