//! CSV readers for recorded tracker output and logged sets
//!
//! Frames: `timestamp,x,y` (seconds, normalized centre of the plate).
//! Sets: `weight_kg,reps,rpe` with RPE optional, newest set first.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{LiftRsError, Result};
use crate::kinematics::NormalizedPoint;
use crate::models::WorkingSet;

/// One row of recorded tracker output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
}

impl RecordedFrame {
    pub fn position(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize)]
struct SetRecord {
    weight_kg: f64,
    reps: u32,
    rpe: Option<f64>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        LiftRsError::Import(format!("Cannot open {}: {}", path.display(), e))
    })
}

fn parse_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R, what: &str) -> Result<Vec<T>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    csv_reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| LiftRsError::Import(format!("Bad {} row {}: {}", what, i + 1, e)))
        })
        .collect()
}

pub fn frames_from_reader<R: Read>(reader: R) -> Result<Vec<RecordedFrame>> {
    parse_rows(reader, "frame")
}

pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedFrame>> {
    let frames = frames_from_reader(open(path.as_ref())?)?;
    tracing::debug!(count = frames.len(), path = %path.as_ref().display(), "Loaded frames");
    Ok(frames)
}

pub fn sets_from_reader<R: Read>(reader: R) -> Result<Vec<WorkingSet>> {
    let records: Vec<SetRecord> = parse_rows(reader, "set")?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| WorkingSet::new(i as u32 + 1, r.weight_kg, r.reps, r.rpe))
        .collect())
}

pub fn read_sets<P: AsRef<Path>>(path: P) -> Result<Vec<WorkingSet>> {
    sets_from_reader(open(path.as_ref())?)
}
