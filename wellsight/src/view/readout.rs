//! Cursor readout: the sample under the mouse for every plotted series.

use serde::Serialize;

use super::chart::{SeriesFrame, YAxis};

/// Index of the last sample at or before `cursor`.
///
/// `timestamps` must be ascending. Among equal timestamps the later sample
/// wins. A cursor before the first sample finds nothing; one past the end
/// finds the last sample.
pub fn nearest_sample(timestamps: &[i64], cursor: i64) -> Option<usize> {
    timestamps.partition_point(|&t| t <= cursor).checked_sub(1)
}

/// Value shown for one series at the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    /// Position of the series in the frame.
    pub series: usize,
    pub axis: YAxis,
    pub name: String,
    pub timestamp: i64,
    pub value: f64,
}

/// Sample under the cursor for each series that has one.
pub fn locate(cursor: i64, series: &[SeriesFrame]) -> Vec<Readout> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let sample = nearest_sample(&s.data.timestamps, cursor)?;
            Some(Readout {
                series: i,
                axis: s.axis,
                name: s.name.clone(),
                timestamp: s.data.timestamps[sample],
                value: *s.data.values.get(sample)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellsight_common::PlotData;

    #[test]
    fn test_nearest_sample() {
        let timestamps = [0, 10, 20, 30];
        assert_eq!(nearest_sample(&timestamps, 15), Some(1));
        assert_eq!(nearest_sample(&timestamps, -5), None);
        assert_eq!(nearest_sample(&timestamps, 35), Some(3));
        assert_eq!(nearest_sample(&timestamps, 0), Some(0));
        assert_eq!(nearest_sample(&timestamps, 20), Some(2));
        assert_eq!(nearest_sample(&timestamps, 29), Some(2));
    }

    #[test]
    fn test_nearest_sample_ties_pick_later() {
        let timestamps = [0, 10, 10, 10, 20];
        assert_eq!(nearest_sample(&timestamps, 10), Some(3));
        assert_eq!(nearest_sample(&timestamps, 15), Some(3));
    }

    #[test]
    fn test_nearest_sample_empty() {
        assert_eq!(nearest_sample(&[], 0), None);
    }

    #[test]
    fn test_locate_skips_series_without_sample() {
        let series = vec![
            SeriesFrame {
                axis: YAxis::Left,
                slot: 0,
                source: 0,
                name: "BASE: WOPR @ P1".to_string(),
                data: PlotData::new(&[0, 10, 20], &[5.0, 6.0, 7.0]),
            },
            SeriesFrame {
                axis: YAxis::Left,
                slot: 0,
                source: 1,
                name: "WF: WOPR @ P1".to_string(),
                data: PlotData::default(),
            },
            SeriesFrame {
                axis: YAxis::Right,
                slot: 0,
                source: 0,
                name: "BASE: WBHP @ P1".to_string(),
                data: PlotData::new(&[12, 24], &[250.0, 240.0]),
            },
        ];

        let readouts = locate(11, &series);
        assert_eq!(readouts.len(), 1);
        assert_eq!(readouts[0].series, 0);
        assert_eq!(readouts[0].timestamp, 10);
        assert_eq!(readouts[0].value, 6.0);

        let readouts = locate(30, &series);
        assert_eq!(readouts.len(), 2);
        assert_eq!(readouts[1].series, 2);
        assert_eq!(readouts[1].axis, YAxis::Right);
        assert_eq!(readouts[1].value, 240.0);
    }
}
