//! Per-frame encoding latency statistics.
//!
//! Collects one latency sample per encoded frame and reports the minimum,
//! average and maximum together with a histogram in one-microsecond buckets.

/// Number of histogram buckets; the last one collects everything slower.
const NUM_BUCKETS: usize = 20;

/// Width of one histogram bucket in nanoseconds.
const BUCKET_NS: u64 = 1_000;

/// Tracks encode latency with minimal overhead.
///
/// Samples are plain nanosecond counts, so updating is a handful of integer
/// operations and the tracker can be filled after a parallel run.
pub struct LatencyStats {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    pub count: u64,
    pub buckets: [u64; NUM_BUCKETS],
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyStats {
    /// Creates an empty tracker; the first sample becomes the minimum.
    pub fn new() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            buckets: [0; NUM_BUCKETS],
        }
    }

    /// Records one latency sample in nanoseconds.
    pub fn update(&mut self, nanos: u64) {
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
        self.sum = self.sum.saturating_add(nanos);
        self.count += 1;

        let idx = ((nanos / BUCKET_NS) as usize).min(NUM_BUCKETS - 1);
        self.buckets[idx] += 1;
    }

    /// Average latency in nanoseconds, or 0.0 before the first sample.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Prints count, min/avg/max and the latency histogram.
    pub fn print_report(&self) {
        println!("\nEncode Latency (per frame)");
        println!("Count: {}", self.count);
        if self.count == 0 {
            return;
        }

        let avg_ns = self.avg();
        if avg_ns < 1000.0 {
            println!("Min:   {:.2} ns", self.min as f64);
            println!("Avg:   {:.2} ns", avg_ns);
            println!("Max:   {:.2} ns", self.max as f64);
        } else {
            println!("Min:   {:.2} us", self.min as f64 / 1000.0);
            println!("Avg:   {:.2} us", avg_ns / 1000.0);
            println!("Max:   {:.2} us", self.max as f64 / 1000.0);
        }

        println!("Distribution (1us buckets):");
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let range_end = if i == NUM_BUCKETS - 1 { ">" } else { "" };
                println!("[{:3}-{:3}{} us]: {}", i, i + 1, range_end, count);
            }
        }
    }
}
