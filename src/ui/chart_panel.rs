use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use crate::state::plot_state::{AxisExtrema, PlotData};

/// Renders the latest graph payload. Returns the chart's screen rect so the
/// app can crop screenshots to it.
pub fn show(ui: &mut egui::Ui, plot: &PlotData, extrema: &AxisExtrema) -> egui::Rect {
    if let Some(title) = plot.title.as_deref() {
        if !title.is_empty() {
            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(title).strong().size(16.0));
            });
        }
    }

    let mut chart = Plot::new("function_chart")
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .show_grid(true);
    if plot.show_legend {
        chart = chart.legend(Legend::default());
    }

    let (ymin, ymax) = y_bounds(plot, extrema);
    let response = chart.show(ui, |plot_ui| {
        if plot.datasets.is_empty() {
            if !plot.points.is_empty() {
                let points: PlotPoints = plot.points.clone().into();
                plot_ui.points(Points::new(points).radius(2.0).name("f"));
            }
        } else {
            for series in &plot.datasets {
                let points: PlotPoints = series.points.clone().into();
                if series.show_line {
                    let mut line = Line::new(points).name(&series.label);
                    if let Some(color) = series.color {
                        line = line.color(color);
                    }
                    plot_ui.line(line);
                } else {
                    let mut markers = Points::new(points).radius(3.0).name(&series.label);
                    if let Some(color) = series.color {
                        markers = markers.color(color);
                    }
                    plot_ui.points(markers);
                }
            }
        }
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [extrema.xmin, ymin],
            [extrema.xmax, ymax],
        ));
    });
    response.response.rect
}

/// Explicit bounds win; otherwise fall back to the padded data extent, or a
/// unit band when there is nothing to measure.
fn y_bounds(plot: &PlotData, extrema: &AxisExtrema) -> (f64, f64) {
    let data_range = plot.y_range();
    let ymin = extrema
        .ymin
        .or(data_range.map(|(lo, _)| lo))
        .unwrap_or(-1.0);
    let ymax = extrema
        .ymax
        .or(data_range.map(|(_, hi)| hi))
        .unwrap_or(1.0);
    (ymin, ymax)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bounds_override_the_data_extent() {
        let mut plot = PlotData::default();
        plot.apply(vec![0.0, 1.0], vec![0.0, 100.0], None, None);
        let mut extrema = AxisExtrema::new(-5.0, 5.0);
        extrema.ymin = Some(-2.0);
        extrema.ymax = Some(2.0);
        assert_eq!(y_bounds(&plot, &extrema), (-2.0, 2.0));
    }

    #[test]
    fn auto_bounds_follow_the_data() {
        let mut plot = PlotData::default();
        plot.apply(vec![0.0, 1.0], vec![0.0, 10.0], None, None);
        let (lo, hi) = y_bounds(&plot, &AxisExtrema::new(-5.0, 5.0));
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn empty_data_falls_back_to_a_unit_band() {
        let plot = PlotData::default();
        assert_eq!(y_bounds(&plot, &AxisExtrema::new(-5.0, 5.0)), (-1.0, 1.0));
    }
}
