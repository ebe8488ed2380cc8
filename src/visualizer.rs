//! Pie chart of qualification levels, written as a standalone HTML page.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use askama::Template;

use crate::models::QualificationLevel;
use crate::{Listing, Result};

const CENTER: f64 = 210.0;
const RADIUS: f64 = 190.0;
/// Slices thinner than this get no percentage label.
const MIN_LABELLED_SHARE: f64 = 0.04;

/// Listing count per level, in [`QualificationLevel::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelFrequencies([usize; 4]);

impl LevelFrequencies {
    pub fn get(&self, level: QualificationLevel) -> usize {
        self.0[Self::index(level)]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QualificationLevel, usize)> + '_ {
        QualificationLevel::ALL.into_iter().zip(self.0.iter().copied())
    }

    fn index(level: QualificationLevel) -> usize {
        match level {
            QualificationLevel::Junior => 0,
            QualificationLevel::Middle => 1,
            QualificationLevel::Senior => 2,
            QualificationLevel::NotSpecified => 3,
        }
    }
}

pub fn count_levels(listings: &[Listing]) -> LevelFrequencies {
    let mut counts = LevelFrequencies::default();
    for listing in listings {
        counts.0[LevelFrequencies::index(listing.qualification_level)] += 1;
    }
    counts
}

fn color(level: QualificationLevel) -> &'static str {
    match level {
        QualificationLevel::Junior => "#636efa",
        QualificationLevel::Middle => "#ef553b",
        QualificationLevel::Senior => "#00cc96",
        QualificationLevel::NotSpecified => "#ab63fa",
    }
}

fn point(angle: f64, radius: f64) -> (f64, f64) {
    (CENTER + radius * angle.cos(), CENTER + radius * angle.sin())
}

struct Slice {
    color: &'static str,
    tooltip: String,
    full_circle: bool,
    path: String,
    /// Percentage drawn inside the slice; empty for thin slices.
    share: String,
    share_x: String,
    share_y: String,
}

struct LegendEntry {
    color: &'static str,
    label: &'static str,
    count: usize,
}

#[derive(Template)]
#[template(path = "statistics.html")]
struct StatisticsPage {
    total: usize,
    side: f64,
    center: f64,
    radius: f64,
    slices: Vec<Slice>,
    legend: Vec<LegendEntry>,
}

fn slices(counts: &LevelFrequencies) -> Vec<Slice> {
    let total = counts.total() as f64;
    let mut start = -FRAC_PI_2;
    let mut slices = Vec::new();

    for (level, count) in counts.iter().filter(|(_, c)| *c > 0) {
        let share = count as f64 / total;
        let end = start + share * TAU;

        let (x1, y1) = point(start, RADIUS);
        let (x2, y2) = point(end, RADIUS);
        let large_arc = u8::from(share > 0.5);
        let (lx, ly) = point(start + share * TAU / 2.0, RADIUS * 0.62);

        slices.push(Slice {
            color: color(level),
            tooltip: format!("{}: {} ({:.1}%)", level.label(), count, share * 100.0),
            full_circle: count as f64 == total,
            path: format!(
                "M {CENTER} {CENTER} L {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
            ),
            share: if share >= MIN_LABELLED_SHARE {
                format!("{:.1}%", share * 100.0)
            } else {
                String::new()
            },
            share_x: format!("{lx:.2}"),
            share_y: format!("{ly:.2}"),
        });

        start = end;
    }

    slices
}

fn legend(counts: &LevelFrequencies) -> Vec<LegendEntry> {
    counts
        .iter()
        .map(|(level, count)| LegendEntry {
            color: color(level),
            label: level.label(),
            count,
        })
        .collect()
}

/// Full HTML page with an interactive pie chart: slices highlight on hover
/// and carry a tooltip with count and share.
pub fn render_chart(counts: &LevelFrequencies) -> Result<String> {
    let page = StatisticsPage {
        total: counts.total(),
        side: CENTER * 2.0,
        center: CENTER,
        radius: RADIUS,
        slices: slices(counts),
        legend: legend(counts),
    };
    Ok(page.render()?)
}

pub fn save_chart(listings: &[Listing], path: impl AsRef<Path>) -> Result<()> {
    let html = render_chart(&count_levels(listings))?;
    std::fs::write(path, html)?;
    Ok(())
}
