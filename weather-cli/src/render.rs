//! Terminal rendering of a [`Dashboard`].
//!
//! Nothing here computes weather data; it only lays out what the core produced.

use std::io;

use chrono::Local;
use cityweather_core::{CurrentConditions, Dashboard, ForecastSeries, MapView, WeatherReport};
use ratatui::{
    Frame, Terminal, TerminalOptions, Viewport,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution, Points},
    },
};

const HEADER_HEIGHT: u16 = 1;
const TILE_HEIGHT: u16 = 3;
const MAP_HEIGHT: u16 = 16;
const LINK_HEIGHT: u16 = 1;
const CHART_HEIGHT: u16 = 18;
const WARNING_HEIGHT: u16 = 4;

/// Degrees of longitude/latitude shown either side of the marker.
const MAP_HALF_WIDTH_DEG: f64 = 20.0;
const MAP_HALF_HEIGHT_DEG: f64 = 10.0;

pub fn required_height(dashboard: &Dashboard) -> u16 {
    match dashboard {
        Dashboard::Unavailable { .. } => WARNING_HEIGHT,
        Dashboard::Ready(report) => {
            let chart = if report.forecast.is_some() { CHART_HEIGHT } else { 0 };
            HEADER_HEIGHT + TILE_HEIGHT + MAP_HEIGHT + LINK_HEIGHT + chart
        }
    }
}

/// Draw below the prompt so earlier dashboards stay in the scrollback.
pub fn draw_inline(dashboard: &Dashboard) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions { viewport: Viewport::Inline(required_height(dashboard)) },
    )?;

    let bottom = terminal.draw(|frame| draw(frame, dashboard))?.area.bottom();

    terminal.set_cursor(0, bottom.saturating_sub(1))?;
    terminal.show_cursor()?;
    drop(terminal);
    println!();

    Ok(())
}

pub fn draw(frame: &mut Frame, dashboard: &Dashboard) {
    let area = frame.size();
    match dashboard {
        Dashboard::Unavailable { .. } => render_warning(frame, area, dashboard),
        Dashboard::Ready(report) => render_report(frame, area, report),
    }
}

fn render_warning(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let message = dashboard.warning().unwrap_or_default();
    let p = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Warning"))
        .wrap(Wrap { trim: true });
    frame.render_widget(p, area);
}

fn render_report(frame: &mut Frame, area: Rect, report: &WeatherReport) {
    let mut constraints = vec![
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(TILE_HEIGHT),
        Constraint::Length(MAP_HEIGHT),
        Constraint::Length(LINK_HEIGHT),
    ];
    if report.forecast.is_some() {
        constraints.push(Constraint::Min(0));
    }

    let rows = Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);

    let header = Line::from(vec![
        Span::styled(
            format!("Current Weather in {}", report.city),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  updated {}", Local::now().format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), rows[0]);

    render_tiles(frame, rows[1], &report.current);
    render_map(frame, rows[2], &report.map, &report.city);

    let link = Paragraph::new(Span::styled(
        report.map.openstreetmap_url(),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(link, rows[3]);

    if let Some(series) = &report.forecast {
        render_chart(frame, rows[4], series);
    }
}

fn tiles(current: &CurrentConditions) -> [(&'static str, String); 3] {
    [
        ("Temperature (°C)", format!("{}°C", current.temperature_c)),
        ("Humidity (%)", format!("{}%", current.humidity_pct)),
        ("Wind Speed (m/s)", format!("{} m/s", current.wind_speed_mps)),
    ]
}

fn render_tiles(frame: &mut Frame, area: Rect, current: &CurrentConditions) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    for ((label, value), col) in tiles(current).into_iter().zip(cols.iter()) {
        let p = Paragraph::new(Span::styled(value, Style::default().add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(p, *col);
    }
}

fn map_bounds(map: &MapView) -> ([f64; 2], [f64; 2]) {
    let x = [
        (map.longitude - MAP_HALF_WIDTH_DEG).max(-180.0),
        (map.longitude + MAP_HALF_WIDTH_DEG).min(180.0),
    ];
    let y = [
        (map.latitude - MAP_HALF_HEIGHT_DEG).max(-90.0),
        (map.latitude + MAP_HALF_HEIGHT_DEG).min(90.0),
    ];
    (x, y)
}

fn render_map(frame: &mut Frame, area: Rect, map: &MapView, city: &str) {
    let (x_bounds, y_bounds) = map_bounds(map);
    let (lon, lat) = (map.longitude, map.latitude);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Weather Map ({lat:.2}, {lon:.2})")),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map { color: Color::DarkGray, resolution: MapResolution::High });
            ctx.layer();
            ctx.draw(&Points { coords: &[(lon, lat)], color: Color::Red });
            ctx.print(lon, lat, Span::styled("●", Style::default().fg(Color::Red)));
        });
    frame.render_widget(canvas, area);

    tracing::trace!(city, ?x_bounds, ?y_bounds, "map drawn");
}

/// Labels for the first, middle and last interval, each at most once.
fn x_labels(series: &ForecastSeries) -> Vec<Span<'static>> {
    let points = series.points();
    let Some(last) = points.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut indices = vec![0, points.len() / 2, last];
    indices.dedup();
    indices.into_iter().map(|i| Span::raw(points[i].label.clone())).collect()
}

fn y_bounds(series: &ForecastSeries) -> [f64; 2] {
    match series.temperature_range() {
        Some((lo, hi)) => [(lo - 1.0).floor(), (hi + 1.0).ceil()],
        None => [0.0, 1.0],
    }
}

fn render_chart(frame: &mut Frame, area: Rect, series: &ForecastSeries) {
    let block = Block::default().borders(Borders::ALL).title("Temperature Trends (Next 5 Days)");

    if series.is_empty() {
        frame.render_widget(Paragraph::new("No forecast intervals returned.").block(block), area);
        return;
    }

    let data = series.chart_points();
    let max_x = (series.len().saturating_sub(1) as f64).max(1.0);
    let [lo, hi] = y_bounds(series);

    let dataset = Dataset::default()
        .name("Temperature")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().title("Date").bounds([0.0, max_x]).labels(x_labels(series)))
        .y_axis(
            Axis::default()
                .title("°C")
                .bounds([lo, hi])
                .labels(vec![Span::raw(format!("{lo}")), Span::raw(format!("{hi}"))]),
        );
    frame.render_widget(chart, area);
}
