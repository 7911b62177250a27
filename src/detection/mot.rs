// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// MOT 文本格式读写
//
// One detection per line:
//   frame,id,x,y,width,height,confidence,px,py,pz
// Boxes are in pixels: normalized boxes are scaled by the frame size on the
// way out. Absent frame / track ids are written as -1.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};

use super::types::{BoundingBox, Detection, Rect2f, Size, UNASSIGNED_ID};
use crate::error::MotParseError;

const FIELDS: [&str; 10] = [
    "frame",
    "id",
    "x",
    "y",
    "width",
    "height",
    "confidence",
    "px",
    "py",
    "pz",
];

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, MotParseError> {
    value.parse().map_err(|_| MotParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn optional_id(id: i64) -> Option<u32> {
    u32::try_from(id).ok()
}

impl FromStr for Detection {
    type Err = MotParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if parts.len() != FIELDS.len() {
            return Err(MotParseError::FieldCount {
                expected: FIELDS.len(),
                found: parts.len(),
            });
        }

        let mut v = [0f32; 8];
        for (i, slot) in v.iter_mut().enumerate() {
            *slot = parse_field(FIELDS[i + 2], parts[i + 2])?;
        }

        Ok(Detection {
            frame: optional_id(parse_field(FIELDS[0], parts[0])?),
            track_id: optional_id(parse_field(FIELDS[1], parts[1])?),
            bbox: BoundingBox::Absolute(Rect2f::new(v[0], v[1], v[2], v[3])),
            confidence: v[4],
            position: [v[5], v[6], v[7]],
            ..Default::default()
        })
    }
}

impl Detection {
    /// 编码为一行 MOT 文本 (no trailing newline)
    ///
    /// `frame_size` converts a normalized box to pixels; absolute boxes are
    /// written as they are.
    pub fn to_mot_line(&self, frame_size: Size) -> String {
        let r = self.bbox.to_absolute(frame_size);
        let [px, py, pz] = self.position;
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.frame.map_or(UNASSIGNED_ID, i64::from),
            self.track_id.map_or(UNASSIGNED_ID, i64::from),
            r.x,
            r.y,
            r.width,
            r.height,
            self.confidence,
            px,
            py,
            pz
        )
    }
}

/// 读取 MOT 文件, 跳过空行
pub fn read_mot(reader: impl BufRead) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let det = line
            .parse::<Detection>()
            .with_context(|| format!("line {}: {:?}", idx + 1, line))?;
        detections.push(det);
    }
    Ok(detections)
}

/// 写出 MOT 文件; `frame_size` is the frame the detections belong to.
pub fn write_mot(
    mut writer: impl Write,
    detections: &[Detection],
    frame_size: Size,
) -> Result<()> {
    for det in detections {
        writeln!(writer, "{}", det.to_mot_line(frame_size))?;
    }
    Ok(())
}
