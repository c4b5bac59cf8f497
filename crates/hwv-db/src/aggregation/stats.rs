//! Pure computation of display rows from a submission snapshot.

use std::collections::{BTreeMap, BTreeSet};

use hwv_core::entities::{HardwareDisplayModel, HardwareSurveySubmission};
use hwv_core::survey::capability_samples;

#[derive(Default)]
struct Bucket {
    submissions: u32,
    samples: u32,
    streams: Vec<u32>,
}

#[derive(Default)]
struct Device<'a> {
    submissions: u32,
    samples: u32,
    buckets: BTreeMap<(&'a str, &'a str), Bucket>,
}

/// Group submissions by device key and compute one summary row per device
/// plus one row per `(codec, resolution)` bucket.
///
/// Submissions without a device key are skipped. Output is ordered by device,
/// then the summary row, then codec and resolution.
#[must_use]
pub fn compute_display_models(
    submissions: &[HardwareSurveySubmission],
    generation: i64,
) -> Vec<HardwareDisplayModel> {
    let mut devices: BTreeMap<&str, Device<'_>> = BTreeMap::new();

    for submission in submissions {
        let Some(key) = submission.device_key.as_deref() else {
            continue;
        };
        let device = devices.entry(key).or_default();
        device.submissions += 1;

        let mut touched = BTreeSet::new();
        for sample in capability_samples(&submission.payload) {
            let bucket = device
                .buckets
                .entry((sample.codec, sample.resolution))
                .or_default();
            bucket.samples += 1;
            device.samples += 1;
            if let Some(streams) = sample.max_streams {
                bucket.streams.push(streams);
            }
            if touched.insert((sample.codec, sample.resolution)) {
                bucket.submissions += 1;
            }
        }
    }

    let mut rows = Vec::new();
    for (device_id, device) in devices {
        rows.push(HardwareDisplayModel {
            device_id: device_id.to_string(),
            codec: None,
            resolution: None,
            submission_count: device.submissions,
            sample_count: device.samples,
            max_streams_min: None,
            max_streams_median: None,
            max_streams_max: None,
            generation,
        });

        for ((codec, resolution), mut bucket) in device.buckets {
            bucket.streams.sort_unstable();
            rows.push(HardwareDisplayModel {
                device_id: device_id.to_string(),
                codec: Some(codec.to_string()),
                resolution: Some(resolution.to_string()),
                submission_count: bucket.submissions,
                sample_count: bucket.samples,
                max_streams_min: bucket.streams.first().copied(),
                max_streams_median: median(&bucket.streams),
                max_streams_max: bucket.streams.last().copied(),
                generation,
            });
        }
    }
    rows
}

/// Median of an already sorted slice. Even lengths average the middle pair.
fn median(sorted: &[u32]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(f64::from(sorted[mid]))
    } else {
        Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0)
    }
}
