use std::path::Path;

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use tracing::{debug, info};

use crate::error::RenderError;
use crate::plot::series::{Metric, PanelSeries, Series};
use crate::plot::style::{kth_style, FigureStyle, MarkerShape, EXPECTED_COLOR};

/// Log-scale padding factor on each side of the x range.
const X_PAD: f64 = 1.25;
/// Headroom above the tallest point.
const Y_HEADROOM: f64 = 1.05;

/// One output image: stacked panels sharing a metric.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub metric: Metric,
    pub panels: Vec<PanelSeries>,
}

pub fn panel_title(panel: &PanelSeries) -> String {
    match panel.metric {
        Metric::Comparisons => format!(
            "{}: Instances and Averages for Different k Values",
            panel.algorithm
        ),
        Metric::RunningTime => format!(
            "{}: Instances and Averages Running Time for Different k Values",
            panel.algorithm
        ),
    }
}

/// Horizontal extent on the log axis. Falls back to one decade for an empty panel.
pub fn x_range(panel: &PanelSeries) -> (f64, f64) {
    let (lo, hi) = panel
        .all_points()
        .map(|(x, _)| x)
        .filter(|x| *x > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if !lo.is_finite() {
        return (1.0, 10.0);
    }
    (lo / X_PAD, hi * X_PAD)
}

/// Vertical extent, always anchored at zero.
pub fn y_range(panel: &PanelSeries) -> (f64, f64) {
    let hi = panel
        .all_points()
        .map(|(_, y)| y)
        .fold(f64::NEG_INFINITY, f64::max);
    if !hi.is_finite() || hi <= 0.0 {
        return (0.0, 1.0);
    }
    (0.0, hi * Y_HEADROOM)
}

/// Write `figure` as a PNG at `path`.
pub fn render_figure(figure: &Figure, path: &Path, style: &FigureStyle) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, (style.width_px, style.height_px)).into_drawing_area();
    draw_figure(&root, figure, style).map_err(|e| RenderError::Draw {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!(path = %path.display(), metric = ?figure.metric, "wrote figure");
    Ok(())
}

/// Render `figure` into a raw RGB buffer instead of a file.
pub fn render_figure_to_buffer(figure: &Figure, style: &FigureStyle) -> Result<Vec<u8>, RenderError> {
    let mut buf = vec![0u8; style.width_px as usize * style.height_px as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (style.width_px, style.height_px))
            .into_drawing_area();
        draw_figure(&root, figure, style).map_err(|e| RenderError::Draw {
            path: "<memory>".into(),
            message: e.to_string(),
        })?;
    }
    Ok(buf)
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    style: &FigureStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let areas = root.split_evenly((figure.panels.len().max(1), 1));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        draw_panel(area, panel, style)?;
    }
    root.present()
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &PanelSeries,
    style: &FigureStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x_lo, x_hi) = x_range(panel);
    let (y_lo, y_hi) = y_range(panel);
    debug!(
        algorithm = %panel.algorithm,
        metric = ?panel.metric,
        x_lo, x_hi, y_hi,
        "drawing panel"
    );

    let mut chart = ChartBuilder::on(area)
        .caption(panel_title(panel), ("sans-serif", style.font(14.0)))
        .margin(style.px(10.0))
        .x_label_area_size(style.px(40.0))
        .y_label_area_size(style.px(70.0))
        .build_cartesian_2d((x_lo..x_hi).log_scale(), y_lo..y_hi)?;

    // Mesh lines double as the grid overlay.
    chart
        .configure_mesh()
        .x_desc("Array Size (log scale)")
        .y_desc(panel.metric.y_label())
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style(("sans-serif", style.font(10.0)))
        .axis_desc_style(("sans-serif", style.font(12.0)))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let mut labelled = false;

    for series in panel.instances.iter().filter(|s| !s.is_empty()) {
        let Some(kth) = series.kth else { continue };
        let (color, shape) = kth_style(kth);
        draw_markers(
            &mut chart,
            &series.points,
            color.mix(style.instance_alpha),
            shape,
            style,
            Legend {
                label: series.name.as_str(),
                line: None,
            },
        )?;
        labelled = true;
    }

    let line_width = style.line_width();
    for series in panel.averages.iter().filter(|s| !s.is_empty()) {
        let Some(kth) = series.kth else { continue };
        let (color, shape) = kth_style(kth);
        let opaque = color.mix(1.0);
        let line = opaque.stroke_width(line_width);
        chart.draw_series(LineSeries::new(series.points.iter().copied(), line))?;
        draw_markers(
            &mut chart,
            &series.points,
            opaque,
            shape,
            style,
            Legend {
                label: series.name.as_str(),
                line: Some(line),
            },
        )?;
        labelled = true;
    }

    if let Some(expected) = panel.expected.as_ref().filter(|s| !s.is_empty()) {
        draw_expected(&mut chart, expected, style)?;
        labelled = true;
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", style.font(9.0)))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .draw()?;
    }
    Ok(())
}

fn draw_expected<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    expected: &Series,
    style: &FigureStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let line_width = style.line_width();
    let dash = style.px(6.0);
    let gap = style.px(4.0);
    let legend_len = style.px(20.0) as i32;
    chart
        .draw_series(DashedLineSeries::new(
            expected.points.iter().copied(),
            dash,
            gap,
            EXPECTED_COLOR.stroke_width(line_width),
        ))?
        .label(expected.name.as_str())
        .legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + legend_len, y)],
                EXPECTED_COLOR.stroke_width(line_width),
            )
        });
    Ok(())
}

/// Legend entry for a marker series. Series drawn with a connecting line
/// show that line behind the marker.
struct Legend<'l> {
    label: &'l str,
    line: Option<ShapeStyle>,
}

/// Segment drawn behind a legend marker, relative to the glyph's left edge.
fn legend_segment(line: Option<ShapeStyle>, len: i32) -> Vec<(i32, i32)> {
    match line {
        Some(_) => vec![(0, 0), (len, 0)],
        None => Vec::new(),
    }
}

/// Scatter `points` with the kth marker and add its legend entry.
fn draw_markers<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    points: &[(f64, f64)],
    color: RGBAColor,
    shape: MarkerShape,
    style: &FigureStyle,
    legend: Legend<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let size = style.marker_size();
    let stroke = style.px(1.0);
    let marker_style = color.stroke_width(stroke);
    let len = style.px(20.0) as i32;
    let mid = (len / 2, 0);
    let segment = legend_segment(legend.line, len);
    let line_style = legend.line.unwrap_or(marker_style);

    match shape {
        MarkerShape::Circle => {
            let anno = chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, size, color.filled())),
            )?;
            anno.label(legend.label).legend(move |p| {
                EmptyElement::at(p)
                    + PathElement::new(segment.clone(), line_style)
                    + Circle::new(mid, size, color.filled())
            });
        }
        MarkerShape::Cross => {
            let anno = chart.draw_series(
                points
                    .iter()
                    .map(|&p| Cross::new(p, size, marker_style)),
            )?;
            anno.label(legend.label).legend(move |p| {
                EmptyElement::at(p)
                    + PathElement::new(segment.clone(), line_style)
                    + Cross::new(mid, size, marker_style)
            });
        }
        MarkerShape::Plus => {
            let arm = size as i32 + 1;
            let anno = chart.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p)
                    + PathElement::new(vec![(-arm, 0), (arm, 0)], marker_style)
                    + PathElement::new(vec![(0, -arm), (0, arm)], marker_style)
            }))?;
            anno.label(legend.label).legend(move |p| {
                EmptyElement::at(p)
                    + PathElement::new(segment.clone(), line_style)
                    + PathElement::new(vec![(mid.0 - arm, 0), (mid.0 + arm, 0)], marker_style)
                    + PathElement::new(vec![(mid.0, -arm), (mid.0, arm)], marker_style)
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{Algorithm, Kth};
    use crate::plot::series::SeriesKind;

    fn panel(points: Vec<(f64, f64)>) -> PanelSeries {
        PanelSeries {
            algorithm: Algorithm::QuickSelect,
            metric: Metric::Comparisons,
            instances: vec![Series {
                name: "First Instances".into(),
                kind: SeriesKind::Instance,
                kth: Some(Kth::First),
                points,
            }],
            averages: vec![],
            expected: None,
        }
    }

    #[test]
    fn empty_panel_uses_default_ranges() {
        let p = panel(vec![]);
        assert_eq!(x_range(&p), (1.0, 10.0));
        assert_eq!(y_range(&p), (0.0, 1.0));
    }

    #[test]
    fn ranges_cover_points() {
        let p = panel(vec![(100.0, 50.0), (10_000.0, 400.0)]);
        let (lo, hi) = x_range(&p);
        assert!(lo < 100.0 && hi > 10_000.0);
        let (y0, y1) = y_range(&p);
        assert_eq!(y0, 0.0);
        assert!((y1 - 420.0).abs() < 1e-9);
    }

    #[test]
    fn legend_segment_only_for_lined_series() {
        assert!(legend_segment(None, 20).is_empty());
        let line = BLUE.stroke_width(2);
        assert_eq!(legend_segment(Some(line), 20), vec![(0, 0), (20, 0)]);
    }

    #[test]
    fn averages_only_panel_renders_marked_legend() {
        let mut p = panel(vec![]);
        p.averages = vec![Series {
            name: "Median Average".into(),
            kind: SeriesKind::Average,
            kth: Some(Kth::Median),
            points: vec![(100.0, 50.0), (1000.0, 400.0)],
        }];
        let figure = Figure {
            metric: Metric::Comparisons,
            panels: vec![p],
        };
        let style = FigureStyle {
            width_px: 200,
            height_px: 200,
            ..FigureStyle::default()
        };
        let buf = render_figure_to_buffer(&figure, &style).unwrap();
        assert_eq!(buf.len(), 200 * 200 * 3);
    }

    #[test]
    fn titles_name_algorithm_and_metric() {
        let mut p = panel(vec![]);
        assert_eq!(
            panel_title(&p),
            "QuickSelect: Instances and Averages for Different k Values"
        );
        p.algorithm = Algorithm::LazySelect;
        p.metric = Metric::RunningTime;
        assert_eq!(
            panel_title(&p),
            "LazySelect: Instances and Averages Running Time for Different k Values"
        );
    }
}
