use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use archery_core::{GameEvent, RenderSnapshot};

/// Receives one snapshot per processed frame, plus the events that frame produced.
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot, events: &[GameEvent]) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Logs events as they happen; no pixels.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot, events: &[GameEvent]) -> Result<()> {
        for event in events {
            log_event(snapshot.frame_index, event);
        }
        Ok(())
    }
}

pub fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::DrawStarted | GameEvent::Released { .. } => {
            tracing::trace!(frame, event = ?event, "gesture");
        }
        other => tracing::debug!(frame, event = ?other, "game event"),
    }
}

/// Writes each snapshot as one JSON line.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    written: u64,
}

impl JsonLinesRenderer<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create render output: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &RenderSnapshot, events: &[GameEvent]) -> Result<()> {
        for event in events {
            log_event(snapshot.frame_index, event);
        }
        serde_json::to_writer(&mut self.out, snapshot)
            .with_context(|| format!("failed to write snapshot {}", snapshot.frame_index))?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush render output")
    }
}
