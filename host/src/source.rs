use std::{fs, path::Path};

use anyhow::{Context, Result};
use archery_core::{Command, FrameInput, Recording};

/// One pulled frame: detector output plus whatever key was pressed with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceFrame {
    pub input: FrameInput,
    pub command: Option<Command>,
}

/// Camera, detector and keyboard behind one seam. `Ok(None)` means the
/// source is exhausted; an error ends the session.
pub trait FrameSource {
    fn frame_size(&self) -> (u32, u32);

    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;
}

pub struct RecordingSource {
    recording: Recording,
    cursor: usize,
}

impl RecordingSource {
    pub fn new(recording: Recording) -> Result<Self> {
        recording.validate().context("invalid recording")?;
        Ok(Self {
            recording,
            cursor: 0,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let recording = load_recording(path)?;
        Self::new(recording).with_context(|| format!("while loading {}", path.display()))
    }

    pub fn remaining(&self) -> usize {
        self.recording.frames.len().saturating_sub(self.cursor)
    }
}

impl FrameSource for RecordingSource {
    fn frame_size(&self) -> (u32, u32) {
        (self.recording.frame_width, self.recording.frame_height)
    }

    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        let Some(recorded) = self.recording.frames.get(self.cursor) else {
            return Ok(None);
        };
        let command = recorded.command;
        let input = self
            .recording
            .frame_input(self.cursor)
            .with_context(|| format!("failed to decode frame {}", self.cursor))?;
        self.cursor += 1;
        Ok(Some(SourceFrame { input, command }))
    }
}

pub fn load_recording(path: &Path) -> Result<Recording> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read recording: {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse recording: {}", path.display()))
}

pub fn write_recording(path: &Path, recording: &Recording) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_vec_pretty(recording).context("failed to serialize recording")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
