/// log2 of the bucket width in sample units.
pub const BUCKET_SHIFT: u32 = 3;

/// 65536 levels / 8 per bucket.
pub const BUCKET_COUNT: usize = 1 << (16 - BUCKET_SHIFT);

/// Histogram of one channel with 8-level buckets over `[0, 65535]`.
#[derive(Debug, Clone)]
pub struct GreenHistogram {
    buckets: Vec<u64>,
}

impl GreenHistogram {
    /// Counts samples that are already clipped into `[0, 65535]`.
    pub fn from_samples(samples: &[f32]) -> Self {
        let mut buckets = vec![0u64; BUCKET_COUNT];
        for &v in samples {
            buckets[((v as u16) >> BUCKET_SHIFT) as usize] += 1;
        }
        Self { buckets }
    }

    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Scans up from bucket 0 until `acc_thresh` samples are accumulated and
    /// returns the bucket index one past the last bucket counted.
    pub fn lower_bin(&self, acc_thresh: u64) -> usize {
        let mut bin = 0;
        let mut acc = 0;
        while acc < acc_thresh && bin < self.buckets.len() {
            acc += self.buckets[bin];
            bin += 1;
        }
        bin
    }

    /// Scans down from the top bucket until `acc_thresh` samples are
    /// accumulated and returns the bucket index one below the last bucket
    /// counted. Bucket 0 is never counted.
    pub fn upper_bin(&self, acc_thresh: u64) -> usize {
        let mut bin = self.buckets.len() - 1;
        let mut acc = 0;
        while acc < acc_thresh && 0 < bin {
            acc += self.buckets[bin];
            bin -= 1;
        }
        bin
    }
}
