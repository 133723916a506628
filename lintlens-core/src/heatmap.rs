//! Heatmap grids with per-cell colours.

use serde::Serialize;
use utoipa::ToSchema;

use crate::cooccurrence::CoOccurrenceMatrix;
use crate::trend::HeatmapSnapshot;

/// Colour of cells that carry no number or sit in a flat grid.
pub const NEUTRAL_COLOR: &str = "rgb(220, 220, 220)";

/// Direction of the colour scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Palette {
    /// Low values red, high values green.
    RedToGreen,
    /// Low values green, high values red.
    GreenToRed,
}

/// Colour of a cell scaled between `min` and `max`.
pub fn cell_color(value: Option<u64>, min: u64, max: u64, palette: Palette) -> String {
    let Some(value) = value else {
        return NEUTRAL_COLOR.to_string();
    };
    if max <= min {
        return NEUTRAL_COLOR.to_string();
    }
    let ratio = (value as f64 - min as f64) / (max as f64 - min as f64);
    let high = (255.0 * ratio).round() as i64;
    let low = (255.0 * (1.0 - ratio)).round() as i64;
    match palette {
        Palette::RedToGreen => format!("rgb({low}, {high}, 0)"),
        Palette::GreenToRed => format!("rgb({high}, {low}, 0)"),
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Cell value; blank cells carry none.
    pub value: Option<u64>,
    /// Background colour.
    pub color: String,
}

/// A labelled grid of coloured cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapGrid {
    /// Column labels.
    pub x_labels: Vec<String>,
    /// Row labels.
    pub y_labels: Vec<String>,
    /// Rows of cells.
    pub cells: Vec<Vec<HeatmapCell>>,
    /// Scale direction.
    pub palette: Palette,
}

impl HeatmapGrid {
    fn build(
        x_labels: Vec<String>,
        y_labels: Vec<String>,
        values: Vec<Vec<Option<u64>>>,
        palette: Palette,
    ) -> Self {
        // Blank cells count as zero for the scale bounds.
        let flat = values.iter().flatten().map(|value| value.unwrap_or(0));
        let min = flat.clone().min().unwrap_or(0);
        let max = flat.max().unwrap_or(0);
        let cells = values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| HeatmapCell {
                        value,
                        color: cell_color(value, min, max, palette),
                    })
                    .collect()
            })
            .collect();
        Self {
            x_labels,
            y_labels,
            cells,
            palette,
        }
    }

    /// Cell at row `y`, column `x`.
    pub fn cell(&self, y: usize, x: usize) -> Option<&HeatmapCell> {
        self.cells.get(y).and_then(|row| row.get(x))
    }
}

/// Upper-triangle grid of a co-occurrence matrix.
///
/// Cells on or below the diagonal and zero counts are blank.
pub fn correlation_grid(matrix: &CoOccurrenceMatrix) -> HeatmapGrid {
    let categories: Vec<_> = matrix.categories().collect();
    let labels: Vec<String> = categories
        .iter()
        .map(|category| category.as_str().to_string())
        .collect();
    let values: Vec<Vec<Option<u64>>> = categories
        .iter()
        .enumerate()
        .map(|(i, x)| {
            categories
                .iter()
                .enumerate()
                .map(|(j, y)| {
                    if j <= i {
                        return None;
                    }
                    let forward = matrix.get(*x, *y);
                    let value = if forward > 0 {
                        forward
                    } else {
                        matrix.get(*y, *x)
                    };
                    (value > 0).then_some(value)
                })
                .collect()
        })
        .collect();
    HeatmapGrid::build(labels.clone(), labels, values, Palette::RedToGreen)
}

/// Grid of the latest per-file counts.
pub fn snapshot_grid(snapshot: &HeatmapSnapshot) -> HeatmapGrid {
    let y_labels: Vec<String> = snapshot.rows.iter().map(|row| row.path.clone()).collect();
    let values: Vec<Vec<Option<u64>>> = snapshot
        .rows
        .iter()
        .map(|row| row.counts.iter().copied().map(Some).collect())
        .collect();
    HeatmapGrid::build(
        snapshot.columns.clone(),
        y_labels,
        values,
        Palette::GreenToRed,
    )
}
