//! Frame discovery for a render output directory.
//!
//! A render job writes one file per frame (`shot_0042.exr`, `beauty.0042.png`,
//! ...). The [`FrameScanner`] lists the directory, pulls a frame number out of
//! every file name and keeps the ones that fall inside the requested
//! [`FrameRange`].
//!
//! # Examples
//!
//! ```no_run
//! use mata_sentry::core::render::{FrameRange, FrameScanner};
//!
//! let range = FrameRange::new(1, 240)?;
//! let scanner = FrameScanner::new("/renders/shot_010", range);
//!
//! for record in scanner.scan() {
//!     println!("{} -> frame {}", record.filename, record.frame_number);
//! }
//! # Ok::<(), mata_sentry::SentryError>(())
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Result, SentryError};

/// Frame-number patterns, tried in order. The first one that matches wins.
static FRAME_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        // 2-10 digits at the very end
        Regex::new(r"([0-9]{2,10})$").expect("static frame pattern"),
        // 2-10 digits right after a separator at the end
        Regex::new(r"[._-]([0-9]{2,10})$").expect("static frame pattern"),
        // 2-10 digits right before a separator
        Regex::new(r"([0-9]{2,10})[._-]").expect("static frame pattern"),
    ]
});

/// Inclusive range of frames a render job is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    start: i64,
    end: i64,
}

impl FrameRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if end < start {
            return Err(SentryError::InvalidFrameRange { start, end });
        }
        // the frame count must fit in a u64
        if end.abs_diff(start).checked_add(1).is_none() {
            return Err(SentryError::FrameRangeTooWide { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of frames in the range (`end - start + 1`)
    pub fn total_frames(&self) -> u64 {
        self.end.abs_diff(self.start) + 1
    }

    pub fn contains(&self, frame: i64) -> bool {
        (self.start..=self.end).contains(&frame)
    }

    pub fn frames(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One frame file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub filename: String,
    pub frame_number: i64,
    pub modified_at: DateTime<Utc>,
}

/// Extract a frame number from a file name.
///
/// The extension is stripped first, then the patterns are tried in priority
/// order. Names with several numeric groups are not disambiguated any further:
/// `shot10_0042.exr` yields 42 because the end-of-name pattern comes first.
pub fn extract_frame_number(filename: &str) -> Option<i64> {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    FRAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(&stem)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    })
}

/// Scanner for frame files inside a single render directory
pub struct FrameScanner {
    dir: PathBuf,
    range: FrameRange,
}

impl FrameScanner {
    pub fn new<P: Into<PathBuf>>(dir: P, range: FrameRange) -> Self {
        Self {
            dir: dir.into(),
            range,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// List frame files in the directory, ascending by frame number.
    ///
    /// A missing or unreadable directory is not an error: the render may not
    /// have started yet, so it simply yields no frames.
    pub fn scan(&self) -> Vec<FrameRecord> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Render directory {:?} not readable: {}", self.dir, e);
                return Vec::new();
            }
        };

        let mut records = Vec::new();

        for entry in entries.flatten() {
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };

            let filename = entry.file_name().to_string_lossy().to_string();
            let Some(frame_number) = extract_frame_number(&filename) else {
                continue;
            };
            if !self.range.contains(frame_number) {
                continue;
            }

            match metadata.modified() {
                Ok(modified) => records.push(FrameRecord {
                    filename,
                    frame_number,
                    modified_at: DateTime::<Utc>::from(modified),
                }),
                Err(e) => log::debug!("No modification time for {:?}: {}", entry.path(), e),
            }
        }

        records.sort_by(|a, b| {
            a.frame_number
                .cmp(&b.frame_number)
                .then_with(|| a.filename.cmp(&b.filename))
        });

        records
    }
}
