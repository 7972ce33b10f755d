// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric outlier rejection for door candidates.

use crate::config::OutlierPolicy;
use crate::geometry::InstanceGeometry;

/// Returns the indices of the candidates that survive `policy`, ascending.
///
/// Degenerate boxes (zero width or height) never survive, whatever the policy.
pub fn inlier_indices(geometries: &[InstanceGeometry], policy: &OutlierPolicy) -> Vec<usize> {
    let candidates = match policy {
        OutlierPolicy::Fixed {
            min_ratio,
            max_width,
            max_height,
        } => fixed_inliers(geometries, *min_ratio, *max_width, *max_height),
        OutlierPolicy::InterquartileRange {
            lower_factor,
            upper_factor,
        } => {
            let areas: Vec<f64> = geometries.iter().map(|g| g.area).collect();
            interquartile_inliers(&areas, *lower_factor, *upper_factor)
        }
    };

    candidates
        .into_iter()
        .filter(|&i| !geometries[i].is_degenerate())
        .collect()
}

/// Keeps candidates with `ratio > min_ratio`, `width < max_width` and
/// `height < max_height`.
pub fn fixed_inliers(
    geometries: &[InstanceGeometry],
    min_ratio: f64,
    max_width: f64,
    max_height: f64,
) -> Vec<usize> {
    geometries
        .iter()
        .enumerate()
        .filter(|(_, g)| g.ratio > min_ratio && g.width < max_width && g.height < max_height)
        .map(|(i, _)| i)
        .collect()
}

/// Keeps values strictly inside `(q25 - lower_factor * iqr, q75 + upper_factor * iqr)`.
pub fn interquartile_inliers(values: &[f64], lower_factor: f64, upper_factor: f64) -> Vec<usize> {
    let (Some(q25), Some(q75)) = (percentile(values, 25.0), percentile(values, 75.0)) else {
        return Vec::new();
    };
    let iqr = q75 - q25;
    let lower = q25 - iqr * lower_factor;
    let upper = q75 + iqr * upper_factor;

    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > lower && v < upper)
        .map(|(i, _)| i)
        .collect()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in percent (0..=100). Returns `None` for empty input.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geom(width: f64, height: f64) -> InstanceGeometry {
        let ratio = if width > 0.0 && height > 0.0 {
            width.min(height) / width.max(height)
        } else {
            0.0
        };
        InstanceGeometry {
            area: width * height,
            width,
            height,
            ratio,
        }
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(percentile(&v, 25.0).unwrap(), 1.75);
        assert_relative_eq!(percentile(&v, 50.0).unwrap(), 2.5);
        assert_relative_eq!(percentile(&v, 75.0).unwrap(), 3.25);
        assert_relative_eq!(percentile(&v, 100.0).unwrap(), 4.0);
        assert_relative_eq!(percentile(&[7.0], 25.0).unwrap(), 7.0);
        assert!(percentile(&[], 50.0).is_none());
    }

    #[test]
    fn fixed_thresholds_are_strict() {
        let gs = [
            geom(1000.0, 2000.0), // kept
            geom(4000.0, 2000.0), // too wide
            geom(1000.0, 3000.0), // height not < 3000
            geom(300.0, 1000.0),  // ratio 0.3 not > 0.3
            geom(900.0, 1000.0),  // kept
        ];
        assert_eq!(fixed_inliers(&gs, 0.3, 3000.0, 3000.0), vec![0, 4]);
    }

    #[test]
    fn interquartile_rejects_extreme_areas() {
        let areas = [10.0, 11.0, 12.0, 13.0, 14.0, 500.0];
        // q25 = 11.25, q75 = 13.75, iqr = 2.5 -> (6.25, 28.75)
        assert_eq!(interquartile_inliers(&areas, 2.0, 6.0), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn identical_values_have_empty_open_interval() {
        // iqr = 0 makes the interval (v, v) empty, like the strict comparison intends.
        assert!(interquartile_inliers(&[5.0, 5.0, 5.0], 2.0, 6.0).is_empty());
    }

    #[test]
    fn degenerate_boxes_never_survive() {
        let gs = [geom(0.0, 100.0), geom(100.0, 100.0)];
        let policy = OutlierPolicy::Fixed {
            min_ratio: 0.0,
            max_width: 1e9,
            max_height: 1e9,
        };
        assert_eq!(inlier_indices(&gs, &policy), vec![1]);

        let iqr = OutlierPolicy::interquartile_range();
        let gs = [geom(10.0, 10.0), geom(0.0, 10.0), geom(11.0, 10.0), geom(12.0, 10.0)];
        assert!(!inlier_indices(&gs, &iqr).contains(&1));
    }
}
