//! Result series produced by sweeps and the sinks that consume them.

use crate::error::{Error, Result};
use crate::harness::RoundResult;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// One line chart: an independent variable and three percentage series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub win: Vec<f64>,
    pub draw: Vec<f64>,
    pub win_or_draw: Vec<f64>,
}

impl Chart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: "Percentage of games".to_string(),
            x: Vec::new(),
            win: Vec::new(),
            draw: Vec::new(),
            win_or_draw: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, round: &RoundResult) {
        self.x.push(x);
        self.win.push(round.win_pct);
        self.draw.push(round.draw_pct);
        self.win_or_draw.push(round.win_or_draw_pct);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// File-system friendly form of the title.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_matches('_').to_string()
    }
}

/// Consumer of finished charts, e.g. a plotting front end.
pub trait ChartSink {
    fn draw(&mut self, chart: &Chart) -> Result<()>;
}

impl ChartSink for Vec<Chart> {
    fn draw(&mut self, chart: &Chart) -> Result<()> {
        self.push(chart.clone());
        Ok(())
    }
}

/// Writes each chart as `<dir>/<slug>.json`.
#[derive(Debug, Clone)]
pub struct JsonChartSink {
    dir: PathBuf,
}

impl JsonChartSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, chart: &Chart) -> PathBuf {
        self.dir.join(format!("{}.json", chart.slug()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartSink for JsonChartSink {
    fn draw(&mut self, chart: &Chart) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io("create chart directory", e))?;
        let path = self.path_for(chart);
        let file = File::create(&path).map_err(|e| Error::io("create chart file", e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, chart)?;
        writer.flush().map_err(|e| Error::io("write chart file", e))?;
        info!(path = %path.display(), points = chart.len(), "chart written");
        Ok(())
    }
}

/// Prints each chart as a text table.
#[derive(Debug)]
pub struct TableChartSink<W: Write> {
    out: W,
}

impl<W: Write> TableChartSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSink for TableChartSink<W> {
    fn draw(&mut self, chart: &Chart) -> Result<()> {
        let write = |e| Error::io("write chart table", e);
        writeln!(self.out, "\n{}", chart.title).map_err(write)?;
        writeln!(
            self.out,
            "{:>12} {:>8} {:>8} {:>10}",
            chart.x_label.split_whitespace().last().unwrap_or("x"),
            "win %",
            "draw %",
            "win+draw %"
        )
        .map_err(write)?;
        for i in 0..chart.len() {
            writeln!(
                self.out,
                "{:>12.2} {:>8.2} {:>8.2} {:>10.2}",
                chart.x[i], chart.win[i], chart.draw[i], chart.win_or_draw[i]
            )
            .map_err(write)?;
        }
        Ok(())
    }
}
