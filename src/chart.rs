// chart.rs
// Chart-ready projection of the iteration history, plus CSV export for
// offline analysis. The crate never draws anything; it only emits series.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::ReplayError;
use crate::solver::HistorySnapshot;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub iteration: u64,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Map a history prefix to its chart series. The caller picks the prefix
/// (usually `HistoryStore::prefix(cursor)`), so the chart grows with playback.
pub fn series(snapshots: &[HistorySnapshot]) -> Vec<ChartPoint> {
    snapshots
        .iter()
        .map(|s| ChartPoint {
            iteration: s.iteration,
            cost: s.cost,
            temperature: s.temperature,
        })
        .collect()
}

pub fn write_csv<W: Write>(mut writer: W, points: &[ChartPoint]) -> io::Result<()> {
    writeln!(writer, "iteration,cost,temperature")?;
    for point in points {
        match point.temperature {
            Some(t) => writeln!(writer, "{},{},{}", point.iteration, point.cost, t)?,
            None => writeln!(writer, "{},{},", point.iteration, point.cost)?,
        }
    }
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(path: P, points: &[ChartPoint]) -> Result<(), ReplayError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, points)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(iteration: u64, cost: f64, temperature: Option<f64>) -> HistorySnapshot {
        HistorySnapshot {
            iteration,
            cost,
            temperature,
            route: Default::default(),
        }
    }

    #[test]
    fn series_carries_optional_temperature_through() {
        let history = vec![
            snapshot(0, 100.0, Some(1000.0)),
            snapshot(10, 90.0, None),
        ];
        let points = series(&history);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].temperature, Some(1000.0));
        assert_eq!(points[1].temperature, None);
    }

    #[test]
    fn csv_leaves_missing_temperature_empty() {
        let points = series(&[
            snapshot(0, 100.0, Some(1000.0)),
            snapshot(5, 95.5, None),
        ]);
        let mut out = Vec::new();
        write_csv(&mut out, &points).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "iteration,cost,temperature\n0,100,1000\n5,95.5,\n"
        );
    }

    #[test]
    fn csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("chart.csv");
        write_csv_file(&path, &series(&[snapshot(1, 2.0, None)])).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("iteration,cost,temperature\n"));
        assert!(text.contains("1,2,"));
    }
}
