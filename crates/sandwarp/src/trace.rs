use std::io::Write;

use animator::Animator;
use anyhow::{Context, Result};
use serde::Serialize;

/// One animator tick as printed by `sandwarp trace`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRow {
    pub tick: u64,
    pub phase: f64,
    pub offset: [f32; 2],
    pub intensity: f32,
}

pub fn collect(animator: &mut Animator, ticks: u64) -> Vec<TraceRow> {
    (1..=ticks)
        .map(|tick| {
            let state = animator.tick();
            TraceRow {
                tick,
                phase: state.phase,
                offset: state.offset.to_array(),
                intensity: state.intensity,
            }
        })
        .collect()
}

pub fn write_rows<W: Write>(out: &mut W, rows: &[TraceRow], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows).context("failed to encode trace")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>6} {:>10} {:>10} {:>10} {:>9}",
        "tick", "phase", "x", "y", "intensity"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:>6} {:>10.4} {:>10.4} {:>10.4} {:>9.5}",
            row.tick, row.phase, row.offset[0], row.offset[1], row.intensity
        )?;
    }
    Ok(())
}
