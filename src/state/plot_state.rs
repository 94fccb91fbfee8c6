use crate::net::protocol::{Dataset, PlotOptions};

/// How the session was launched. Presentation sessions render the chart alone
/// and are driven entirely by backend pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Interactive,
    Presentation,
}

/// Axis bounds for the sampled region. `None` y-bounds let the chart
/// auto-scale vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtrema {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
}

impl AxisExtrema {
    pub fn new(xmin: f64, xmax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin: None,
            ymax: None,
        }
    }
}

/// One renderable series, converted from the wire form.
#[derive(Debug, Clone)]
pub struct SeriesData {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub color: Option<egui::Color32>,
    pub show_line: bool,
}

/// The most recent graph payload, ready for the chart panel.
#[derive(Debug, Clone, Default)]
pub struct PlotData {
    /// Sampled (x, y) pairs from the flat labels/data arrays.
    pub points: Vec<[f64; 2]>,
    /// Presentation-mode series; takes precedence over `points` when present.
    pub datasets: Vec<SeriesData>,
    pub title: Option<String>,
    pub show_legend: bool,
}

impl PlotData {
    pub fn apply(
        &mut self,
        labels: Vec<f64>,
        data: Vec<f64>,
        datasets: Option<Vec<Dataset>>,
        options: Option<PlotOptions>,
    ) {
        self.points = labels
            .into_iter()
            .zip(data)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| [x, y])
            .collect();
        self.datasets = datasets
            .unwrap_or_default()
            .into_iter()
            .map(|ds| SeriesData {
                color: ds.color.as_deref().and_then(parse_hex_color),
                points: ds
                    .x
                    .into_iter()
                    .zip(ds.y)
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(x, y)| [x, y])
                    .collect(),
                label: ds.label,
                show_line: ds.show_line,
            })
            .collect();
        if let Some(options) = options {
            self.title = options.title;
            self.show_legend = options.legend;
        }
    }

    /// Vertical extent of everything currently drawn, with a little padding so
    /// extreme samples do not sit on the frame edge.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut scan = |points: &[[f64; 2]]| {
            for p in points {
                y_min = y_min.min(p[1]);
                y_max = y_max.max(p[1]);
            }
        };
        if self.datasets.is_empty() {
            scan(&self.points);
        } else {
            for series in &self.datasets {
                scan(&series.points);
            }
        }
        if y_min.is_finite() && y_max.is_finite() {
            let padding = ((y_max - y_min) * 0.05).max(f64::EPSILON);
            Some((y_min - padding, y_max + padding))
        } else {
            None
        }
    }
}

/// Parses "#rrggbb" (or "#rgb") into a color.
pub fn parse_hex_color(text: &str) -> Option<egui::Color32> {
    let hex = text.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            (channel(0).ok()?, channel(1).ok()?, channel(2).ok()?)
        }
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        _ => return None,
    };
    Some(egui::Color32::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_zips_labels_and_data() {
        let mut plot = PlotData::default();
        plot.apply(vec![0.0, 1.0, 2.0], vec![5.0, f64::NAN, 7.0], None, None);
        assert_eq!(plot.points, vec![[0.0, 5.0], [2.0, 7.0]]);
        assert!(plot.datasets.is_empty());
    }

    #[test]
    fn y_range_pads_the_data_extent() {
        let mut plot = PlotData::default();
        plot.apply(vec![0.0, 1.0], vec![0.0, 10.0], None, None);
        let (lo, hi) = plot.y_range().unwrap();
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn parse_hex_color_handles_short_and_long_forms() {
        assert_eq!(
            parse_hex_color("#0000ff"),
            Some(egui::Color32::from_rgb(0, 0, 255))
        );
        assert_eq!(
            parse_hex_color("#f00"),
            Some(egui::Color32::from_rgb(255, 0, 0))
        );
        assert_eq!(parse_hex_color("red"), None);
    }
}
