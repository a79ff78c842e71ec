//! Recorded detector output, one JSON object per frame per line:
//!
//! ```text
//! {"timestamp": 0.0, "width": 640, "height": 480,
//!  "detections": [{"class_name": "knife", "confidence": 0.9, "bbox": [100, 300, 140, 360]}]}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::error::ReplayError;
use crate::geometry::BoundingBox;
use crate::tracker::Detection;

#[derive(Debug, Deserialize)]
struct FrameRecord {
    timestamp: f64,
    width: u32,
    height: u32,
    #[serde(default)]
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Deserialize)]
struct DetectionRecord {
    class_name: String,
    confidence: f32,
    bbox: [f32; 4],
}

/// One frame of recorded detector output, boxes already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    pub detections: Vec<Detection>,
}

/// Iterates recorded frames from a JSON-lines source, skipping blank lines.
pub struct ReplayReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl ReplayReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ReplayReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<RecordedFrame, ReplayError> {
        let record: FrameRecord = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
            line: self.line_no,
            source,
        })?;

        let detections = record
            .detections
            .into_iter()
            .enumerate()
            .map(|(index, det)| {
                let [x1, y1, x2, y2] = det.bbox;
                BoundingBox::try_new(x1, y1, x2, y2)
                    .map(|bbox| Detection::from_bbox(bbox, det.class_name, det.confidence))
                    .map_err(|source| ReplayError::InvalidDetection {
                        line: self.line_no,
                        index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecordedFrame {
            timestamp: record.timestamp,
            width: record.width,
            height: record.height,
            detections,
        })
    }
}

impl<R: BufRead> Iterator for ReplayReader<R> {
    type Item = Result<RecordedFrame, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse(&line));
        }
    }
}
