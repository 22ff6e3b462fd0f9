use crate::aggregate::{AggregatedSeries, Sample};
use crate::identifier::Distribution;
use crate::layout::RenderPlan;
use crate::report;
use anyhow::{anyhow, Context, Result};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::PathBuf;
use svg2pdf::usvg;

// Font sizes
const TITLE_FONT_SIZE: u32 = 30;
const PANEL_TITLE_FONT_SIZE: u32 = 22;
const AXIS_LABEL_FONT_SIZE: u32 = 16;
const TICK_LABEL_FONT_SIZE: u32 = 14;
const LEGEND_FONT_SIZE: u32 = 13;
const DATA_LABEL_FONT_SIZE: u32 = 10;

// Layout tuning
const TITLE_AREA_HEIGHT: u32 = 70;
const PANEL_MARGIN: u32 = 14;
const X_LABEL_AREA_SIZE: u32 = 50;
const Y_LABEL_AREA_SIZE: u32 = 70;
const MARKER_SIZE: i32 = 4;
const BAR_GROUP_WIDTH: f64 = 0.7;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    /// Converted from the rendered SVG
    Pdf,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Png => "png",
        }
    }
}

/// Point marker drawn on line charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Fill and outline of one algorithm's bars
#[derive(Debug, Clone, Copy)]
pub struct BarStyle {
    pub fill: RGBColor,
    pub edge: RGBColor,
}

/// Palettes, curated sizes and dimensions shared by both renderers
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Line colors, indexed by position in the plan's algorithm order
    pub colors: Vec<RGBColor>,
    pub markers: Vec<Marker>,
    pub bar_styles: Vec<BarStyle>,
    /// Message sizes that get a bar group
    pub bar_sizes: Vec<u64>,
    pub formats: Vec<ImageFormat>,
    pub width: u32,
    pub line_panel_height: u32,
    pub bar_panel_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                RGBColor(37, 99, 235),  // Blue
                RGBColor(220, 38, 38),  // Red
                RGBColor(5, 150, 105),  // Green
                RGBColor(124, 58, 237), // Purple
                RGBColor(234, 88, 12),  // Orange
                RGBColor(8, 145, 178),  // Cyan
            ],
            markers: vec![
                Marker::Circle,
                Marker::Square,
                Marker::Triangle,
                Marker::Cross,
                Marker::Circle,
                Marker::Square,
            ],
            bar_styles: vec![
                BarStyle {
                    fill: RGBColor(209, 213, 219),
                    edge: RGBColor(55, 65, 81),
                },
                BarStyle {
                    fill: RGBColor(255, 255, 255),
                    edge: RGBColor(55, 65, 81),
                },
                BarStyle {
                    fill: RGBColor(254, 202, 202),
                    edge: RGBColor(153, 27, 27),
                },
                BarStyle {
                    fill: RGBColor(220, 252, 231),
                    edge: RGBColor(22, 101, 52),
                },
                BarStyle {
                    fill: RGBColor(233, 213, 255),
                    edge: RGBColor(107, 33, 168),
                },
                BarStyle {
                    fill: RGBColor(254, 215, 170),
                    edge: RGBColor(194, 65, 12),
                },
            ],
            bar_sizes: vec![256, 512, 1024, 4096, 8192, 65536, 262_144, 1_048_576],
            formats: vec![ImageFormat::Svg, ImageFormat::Pdf, ImageFormat::Png],
            width: 1200,
            line_panel_height: 450,
            bar_panel_height: 400,
        }
    }
}

impl ChartConfig {
    fn color(&self, idx: usize) -> RGBColor {
        cycle(&self.colors, idx).unwrap_or(BLACK)
    }

    fn marker(&self, idx: usize) -> Marker {
        cycle(&self.markers, idx).unwrap_or(Marker::Circle)
    }

    fn bar_style(&self, idx: usize) -> BarStyle {
        cycle(&self.bar_styles, idx).unwrap_or(BarStyle {
            fill: RGBColor(128, 128, 128),
            edge: BLACK,
        })
    }
}

fn cycle<T: Copy>(items: &[T], idx: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[idx % items.len()])
    }
}

/// Format a byte count with binary suffixes: `512`, `4K`, `1M`.
pub fn format_size(bytes: f64) -> String {
    if bytes >= 1_048_576.0 {
        format!("{}M", (bytes / 1_048_576.0) as u64)
    } else if bytes >= 1024.0 {
        format!("{}K", (bytes / 1024.0) as u64)
    } else {
        format!("{}", bytes as u64)
    }
}

/// Tick label for a log2 size axis; only whole powers of two are labeled.
fn format_log2_tick(exponent: f64) -> String {
    let nearest = exponent.round();
    if (exponent - nearest).abs() < 1e-6 && nearest >= 0.0 {
        format_size(nearest.exp2())
    } else {
        String::new()
    }
}

/// Padded log2 bounds for the size axis
fn log2_bounds(size_range: Option<(u64, u64)>) -> (f64, f64) {
    match size_range {
        Some((min, max)) => (
            (min.max(1) as f64).log2().floor() - 0.3,
            (max.max(1) as f64).log2().ceil() + 0.3,
        ),
        None => (0.0, 1.0),
    }
}

/// Center offset of bar `idx` within a group of `count` bars
fn bar_offset(idx: usize, count: usize) -> f64 {
    let bar_width = BAR_GROUP_WIDTH / count.max(1) as f64;
    (idx as f64 - (count as f64 - 1.0) / 2.0) * bar_width
}

/// Throughput of the first sample measured at exactly `size`
fn bar_value(samples: &[Sample], size: u64) -> Option<f64> {
    samples.iter().find(|s| s.size == size).map(|s| s.throughput)
}

fn figure_title(base: &str, context: &report::Context) -> String {
    let date = context.short_date();
    if date.is_empty() {
        format!("{} ({})", base, context.host())
    } else {
        format!("{} ({}, {})", base, context.host(), date)
    }
}

fn output_path(prefix: &str, suffix: &str, format: ImageFormat) -> PathBuf {
    PathBuf::from(format!("{}_{}.{}", prefix, suffix, format.extension()))
}

/// A multi-panel figure that can be drawn on any plotters backend
trait Figure {
    const SUFFIX: &'static str;

    fn dimensions(&self) -> (u32, u32);

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

fn export<F: Figure>(figure: &F, prefix: &str, formats: &[ImageFormat]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(formats.len());
    let svg = render_svg(figure)?;

    for &format in formats {
        let path = output_path(prefix, F::SUFFIX, format);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }

        match format {
            ImageFormat::Svg => {
                std::fs::write(&path, &svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            ImageFormat::Pdf => {
                std::fs::write(&path, svg_to_pdf(&svg)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(&path, figure.dimensions()).into_drawing_area();
                figure.draw(&root)?;
                root.present()
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        println!("Saved: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn render_svg<F: Figure>(figure: &F) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.dimensions()).into_drawing_area();
        figure.draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse rendered SVG")?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| anyhow!("Failed to convert chart to PDF: {:?}", err))
}

/// Draw one panel per distribution in plan order and blank the unused cells.
fn draw_panels<DB, F>(body: &DrawingArea<DB, Shift>, plan: &RenderPlan, mut draw_panel: F) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: FnMut(&DrawingArea<DB, Shift>, &Distribution) -> Result<()>,
{
    let panels = body.split_evenly((plan.grid.rows, plan.grid.columns));
    for (dist, area) in plan.distribution_order.iter().zip(panels.iter()) {
        draw_panel(area, dist)?;
    }
    for cell in plan.hidden_cells() {
        if let Some(area) = panels.get(cell) {
            area.fill(&WHITE)?;
        }
    }
    Ok(())
}

struct LineFigure<'a> {
    series: &'a AggregatedSeries,
    plan: &'a RenderPlan,
    context: &'a report::Context,
    config: &'a ChartConfig,
}

impl Figure for LineFigure<'_> {
    const SUFFIX: &'static str = "line";

    fn dimensions(&self) -> (u32, u32) {
        let rows = self.plan.grid.rows as u32;
        (
            self.config.width,
            TITLE_AREA_HEIGHT + rows * self.config.line_panel_height,
        )
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let title = figure_title("Varint Decoding Throughput by Distribution", self.context);
        let body = root.titled(&title, ("sans-serif", TITLE_FONT_SIZE))?;
        draw_panels(&body, self.plan, |area, dist| self.draw_panel(area, dist))
    }
}

impl LineFigure<'_> {
    fn draw_panel<DB>(&self, area: &DrawingArea<DB, Shift>, dist: &Distribution) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (x_min, x_max) = log2_bounds(self.plan.size_range);
        let num_ticks = (x_max - x_min).ceil() as usize + 1;

        let mut chart = ChartBuilder::on(area)
            .caption(dist.label(), ("sans-serif", PANEL_TITLE_FONT_SIZE))
            .margin(PANEL_MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(x_min..x_max, 0.0..self.plan.shared_axis_max)?;

        chart
            .configure_mesh()
            .x_labels(num_ticks)
            .x_label_formatter(&|x| format_log2_tick(*x))
            .x_desc("Message Size (bytes)")
            .y_desc("Throughput (MiB/s)")
            .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
            .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
            .draw()?;

        for (algo_idx, algo) in self.plan.algorithm_order.iter().enumerate() {
            let Some(samples) = self.series.samples(dist, algo) else {
                continue;
            };
            let color = self.config.color(algo_idx);

            let points: Vec<(f64, f64)> = samples
                .iter()
                .map(|s| ((s.size as f64).log2(), s.throughput))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(algo.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });

            draw_markers(&mut chart, points, self.config.marker(algo_idx), color)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LEGEND_FONT_SIZE))
            .draw()?;

        Ok(())
    }
}

fn draw_markers<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: Vec<(f64, f64)>,
    marker: Marker,
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = color.filled();
    match marker {
        Marker::Circle => {
            chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, MARKER_SIZE, style)),
            )?;
        }
        Marker::Square => {
            chart.draw_series(points.into_iter().map(|p| {
                EmptyElement::at(p)
                    + Rectangle::new([(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)], style)
            }))?;
        }
        Marker::Triangle => {
            chart.draw_series(
                points
                    .into_iter()
                    .map(|p| TriangleMarker::new(p, MARKER_SIZE + 1, style)),
            )?;
        }
        Marker::Cross => {
            chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Cross::new(p, MARKER_SIZE, color.stroke_width(2))),
            )?;
        }
    }
    Ok(())
}

struct BarFigure<'a> {
    series: &'a AggregatedSeries,
    plan: &'a RenderPlan,
    context: &'a report::Context,
    config: &'a ChartConfig,
}

impl Figure for BarFigure<'_> {
    const SUFFIX: &'static str = "bar";

    fn dimensions(&self) -> (u32, u32) {
        let rows = self.plan.grid.rows as u32;
        (
            self.config.width,
            TITLE_AREA_HEIGHT + rows * self.config.bar_panel_height,
        )
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let title = figure_title("Varint Decoding Throughput (Grouped Bars)", self.context);
        let body = root.titled(&title, ("sans-serif", TITLE_FONT_SIZE))?;
        draw_panels(&body, self.plan, |area, dist| self.draw_panel(area, dist))
    }
}

impl BarFigure<'_> {
    fn draw_panel<DB>(&self, area: &DrawingArea<DB, Shift>, dist: &Distribution) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let bar_sizes = &self.config.bar_sizes;
        let num_sizes = bar_sizes.len();
        let num_algos = self.plan.algorithm_order.len();
        let y_max = self.plan.shared_axis_max;

        let mut chart = ChartBuilder::on(area)
            .caption(dist.label(), ("sans-serif", PANEL_TITLE_FONT_SIZE))
            .margin(PANEL_MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(-0.5..(num_sizes as f64 - 0.5), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(num_sizes)
            .x_label_formatter(&|x| {
                let idx = x.round() as usize;
                if idx < num_sizes && (x - idx as f64).abs() < 0.3 {
                    bar_sizes
                        .get(idx)
                        .map(|&s| format_size(s as f64))
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .x_desc("Input buffer size")
            .y_desc("Throughput (MiB/s)")
            .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
            .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
            .draw()?;

        let bar_width = BAR_GROUP_WIDTH / num_algos.max(1) as f64;

        for (algo_idx, algo) in self.plan.algorithm_order.iter().enumerate() {
            let Some(samples) = self.series.samples(dist, algo) else {
                continue;
            };
            let style = self.config.bar_style(algo_idx);

            for (size_idx, &size) in bar_sizes.iter().enumerate() {
                let Some(value) = bar_value(samples, size) else {
                    continue;
                };

                let x_center = size_idx as f64 + bar_offset(algo_idx, num_algos);
                let x_left = x_center - bar_width / 2.0;
                let x_right = x_center + bar_width / 2.0;

                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x_left, 0.0), (x_right, value)],
                    style.fill.filled(),
                )))?;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x_left, 0.0), (x_right, value)],
                    style.edge.stroke_width(1),
                )))?;

                chart.draw_series(std::iter::once(Text::new(
                    format!("{:.0}", value),
                    (x_center, value + y_max * 0.01),
                    ("sans-serif", DATA_LABEL_FONT_SIZE)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Bottom)),
                )))?;
            }

            // Legend entry
            chart
                .draw_series(std::iter::once(Circle::new((0.0, 0.0), 0, style.fill.filled())))?
                .label(algo.as_str())
                .legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + Rectangle::new([(0, -5), (20, 5)], style.fill.filled())
                        + Rectangle::new([(0, -5), (20, 5)], style.edge.stroke_width(1))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LEGEND_FONT_SIZE))
            .draw()?;

        Ok(())
    }
}

/// Render one line panel per distribution, one line per algorithm.
///
/// Writes `<prefix>_line.<ext>` for every configured format and returns the
/// written paths. An empty plan writes nothing.
pub fn render_line_chart(
    series: &AggregatedSeries,
    plan: &RenderPlan,
    context: &report::Context,
    config: &ChartConfig,
    prefix: &str,
) -> Result<Vec<PathBuf>> {
    if plan.is_empty() {
        println!("No data to plot");
        return Ok(Vec::new());
    }

    let figure = LineFigure {
        series,
        plan,
        context,
        config,
    };
    export(&figure, prefix, &config.formats)
}

/// Render one grouped-bar panel per distribution over the curated bar sizes.
pub fn render_bar_chart(
    series: &AggregatedSeries,
    plan: &RenderPlan,
    context: &report::Context,
    config: &ChartConfig,
    prefix: &str,
) -> Result<Vec<PathBuf>> {
    if plan.is_empty() {
        println!("No data to plot");
        return Ok(Vec::new());
    }

    let figure = BarFigure {
        series,
        plan,
        context,
        config,
    };
    export(&figure, prefix, &config.formats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;
    use crate::report::RawRecord;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(256.0), "256");
        assert_eq!(format_size(1023.0), "1023");
        assert_eq!(format_size(1024.0), "1K");
        assert_eq!(format_size(65536.0), "64K");
        assert_eq!(format_size(1_048_575.0), "1023K");
        assert_eq!(format_size(1_048_576.0), "1M");
        assert_eq!(format_size(4_194_304.0), "4M");
    }

    #[test]
    fn test_log2_ticks() {
        assert_eq!(format_log2_tick(10.0), "1K");
        assert_eq!(format_log2_tick(20.0), "1M");
        assert_eq!(format_log2_tick(8.0), "256");
        assert_eq!(format_log2_tick(10.5), "");
        assert_eq!(format_log2_tick(-1.0), "");
    }

    #[test]
    fn test_log2_bounds() {
        let close = |(a, b): (f64, f64), (c, d): (f64, f64)| {
            (a - c).abs() < 1e-9 && (b - d).abs() < 1e-9
        };
        assert!(close(log2_bounds(Some((1024, 1_048_576))), (9.7, 20.3)));
        assert!(close(log2_bounds(Some((1000, 1000))), (8.7, 10.3)));
        assert_eq!(log2_bounds(None), (0.0, 1.0));
    }

    #[test]
    fn test_bar_offsets_are_centered() {
        assert_eq!(bar_offset(0, 1), 0.0);
        let offsets: Vec<f64> = (0..2).map(|i| bar_offset(i, 2)).collect();
        assert!((offsets[0] + 0.175).abs() < 1e-12);
        assert!((offsets[1] - 0.175).abs() < 1e-12);
        let sum: f64 = (0..5).map(|i| bar_offset(i, 5)).sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn test_bar_value_takes_first_match() {
        let samples = [
            Sample {
                size: 1024,
                throughput: 1.0,
                bytes_per_cycle: 0.0,
            },
            Sample {
                size: 1024,
                throughput: 2.0,
                bytes_per_cycle: 0.0,
            },
        ];
        assert_eq!(bar_value(&samples, 1024), Some(1.0));
        assert_eq!(bar_value(&samples, 2048), None);
    }

    #[test]
    fn test_palette_cycles() {
        let config = ChartConfig::default();
        assert_eq!(config.color(6), config.color(0));
        assert_eq!(config.marker(7), config.marker(1));

        let empty = ChartConfig {
            colors: Vec::new(),
            markers: Vec::new(),
            ..ChartConfig::default()
        };
        assert_eq!(empty.color(3), BLACK);
        assert_eq!(empty.marker(3), Marker::Circle);
    }

    #[test]
    fn test_figure_title() {
        let context = report::Context {
            host_name: Some("bananapi".to_string()),
            date: Some("2025-01-14T10:22:31+00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            figure_title("Throughput", &context),
            "Throughput (bananapi, 2025-01-14)"
        );
        assert_eq!(
            figure_title("Throughput", &report::Context::default()),
            "Throughput (unknown)"
        );
    }

    #[test]
    fn test_output_paths() {
        let paths: Vec<PathBuf> = ChartConfig::default()
            .formats
            .iter()
            .map(|&f| output_path("out/varint", "line", f))
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/varint_line.svg"),
                PathBuf::from("out/varint_line.pdf"),
                PathBuf::from("out/varint_line.png")
            ]
        );
    }

    fn three_distribution_series() -> AggregatedSeries {
        let mut records = Vec::new();
        for (algo, scale) in [("scalar", 1.0), ("vecshift", 1.9)] {
            for dist in ["90, 4, 3, 2, 1", "80, 10, 5, 3, 2", "20, 20, 20, 20, 20"] {
                for exp in 10..=20 {
                    let size = 1u64 << exp;
                    records.push(RawRecord::new(
                        format!("BM<{algo}, {dist}>/{size}"),
                        scale * 240.0 * crate::aggregate::MIB,
                    ));
                }
            }
        }
        // Only present in one panel, so the others are missing an algorithm.
        records.push(RawRecord::new(
            "BM<maskshift, 90, 4, 3, 2, 1>/4096",
            300.0 * crate::aggregate::MIB,
        ));
        AggregatedSeries::from_records(&records).0
    }

    #[test]
    fn test_render_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("varint").display().to_string();

        let series = three_distribution_series();
        let plan = RenderPlan::new(&series, &LayoutConfig::default());
        assert_eq!(plan.hidden_cells(), 3..4);

        let config = ChartConfig::default();
        let context = report::Context {
            host_name: Some("bananapi".to_string()),
            date: Some("2025-01-14T10:22:31+00:00".to_string()),
            ..Default::default()
        };

        let line = render_line_chart(&series, &plan, &context, &config, &prefix).unwrap();
        let bar = render_bar_chart(&series, &plan, &context, &config, &prefix).unwrap();

        for (kind, written) in [("line", &line), ("bar", &bar)] {
            assert_eq!(written.len(), 3);
            for ext in ["svg", "pdf", "png"] {
                let path = dir.path().join(format!("varint_{kind}.{ext}"));
                assert!(written.contains(&path), "{} not reported", path.display());
                let len = std::fs::metadata(&path).unwrap().len();
                assert!(len > 0, "{} is empty", path.display());
            }
        }

        let pdf = std::fs::read(dir.path().join("varint_line.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let svg = std::fs::read_to_string(dir.path().join("varint_bar.svg")).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_empty_plan_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("empty").display().to_string();

        let (series, _) = AggregatedSeries::from_records(&Vec::new());
        let plan = RenderPlan::new(&series, &LayoutConfig::default());
        let config = ChartConfig::default();
        let context = report::Context::default();

        let line = render_line_chart(&series, &plan, &context, &config, &prefix).unwrap();
        let bar = render_bar_chart(&series, &plan, &context, &config, &prefix).unwrap();
        assert!(line.is_empty());
        assert!(bar.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
