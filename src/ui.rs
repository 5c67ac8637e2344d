use crate::aggregate::ChartRow;
use crate::core::DashCore;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

const APP_TITLE_WITH_VERSION: &str = "mviz v0.1.0  ";
const BAR_LABEL_WIDTH: usize = 14;

#[derive(Clone, Copy)]
struct Palette {
    bg: Color,
    panel_bg: Color,
    panel_alt_bg: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    alert: Color,
    bar: Color,
    selected_bg: Color,
}

fn palette() -> Palette {
    Palette {
        bg: Color::Rgb(10, 15, 24),
        panel_bg: Color::Rgb(19, 29, 43),
        panel_alt_bg: Color::Rgb(24, 38, 58),
        border: Color::Rgb(69, 121, 176),
        text: Color::Rgb(214, 228, 248),
        muted: Color::Rgb(149, 173, 204),
        accent: Color::Rgb(100, 203, 184),
        alert: Color::Rgb(249, 174, 88),
        bar: Color::Rgb(156, 186, 255),
        selected_bg: Color::Rgb(34, 55, 82),
    }
}

/// The screen region of the genre browser, for mouse-wheel hit testing.
pub fn genre_list_rect(area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[1]);

    body[0]
}

pub fn draw(frame: &mut Frame, core: &DashCore) {
    let colors = palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg)),
        frame.area(),
    );

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, core, &colors, vertical[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(vertical[1]);

    draw_genre_browser(frame, core, &colors, body[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(body[1]);

    draw_summary(frame, core, &colors, right[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);
    let left_cells = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[0]);
    let right_cells = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    draw_chart(
        frame,
        "Top Artists",
        &core.snapshot.artists,
        &colors,
        left_cells[0],
    );
    draw_durations(frame, core, &colors, left_cells[1]);
    draw_chart(
        frame,
        "Release Years",
        &core.snapshot.years,
        &colors,
        right_cells[0],
    );
    draw_chart(
        frame,
        "Added Timeline",
        &core.snapshot.timeline,
        &colors,
        right_cells[1],
    );

    draw_footer(frame, core, &colors, vertical[2]);
}

fn draw_header(frame: &mut Frame, core: &DashCore, colors: &Palette, area: Rect) {
    frame.render_widget(
        panel_block("Status", colors.panel_bg, colors.text, colors.border),
        area,
    );

    let inner = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            APP_TITLE_WITH_VERSION,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Files {}", core.files.len()),
            Style::default().fg(colors.text),
        ),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(
            format!("Filter {}", core.selection.label()),
            Style::default().fg(colors.alert),
        ),
    ]));
    frame.render_widget(header, inner);
}

fn draw_genre_browser(frame: &mut Frame, core: &DashCore, colors: &Palette, area: Rect) {
    let rows = &core.snapshot.genres;
    let mut items: Vec<ListItem> = Vec::with_capacity(rows.len() + 1);

    items.push(genre_item(
        "All genres",
        None,
        core.is_row_active(0),
        colors,
    ));
    for (idx, row) in rows.iter().enumerate() {
        items.push(genre_item(
            &row.label,
            Some(row.count),
            core.is_row_active(idx + 1),
            colors,
        ));
    }

    let mut state = ListState::default();
    state.select(Some(core.cursor));

    let list = List::new(items)
        .block(panel_block(
            "Genres",
            colors.panel_bg,
            colors.text,
            colors.border,
        ))
        .highlight_style(
            Style::default()
                .bg(colors.selected_bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("-> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn genre_item<'a>(
    name: &'a str,
    count: Option<u64>,
    active: bool,
    colors: &Palette,
) -> ListItem<'a> {
    let marker = if active { "  * " } else { "    " };
    let label = match count {
        Some(count) => format!("{name}  ({count})"),
        None => name.to_string(),
    };
    let style = if active {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.text)
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(colors.muted)),
        Span::styled(label, style),
    ]))
}

fn draw_summary(frame: &mut Frame, core: &DashCore, colors: &Palette, area: Rect) {
    let summary = &core.snapshot.summary;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Shown",
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} files", summary.shown_files),
                Style::default().fg(colors.text),
            ),
        ]),
        Line::from(Span::styled(
            format!("Library  {} files", summary.total_files),
            Style::default().fg(colors.muted),
        )),
        Line::from(Span::styled(
            format!(
                "Genres   {}   Artists {}",
                summary.unique_genres, summary.unique_artists
            ),
            Style::default().fg(colors.muted),
        )),
        Line::from(Span::styled(
            format!("Errors   {}", summary.files_with_errors),
            Style::default().fg(if summary.files_with_errors > 0 {
                colors.alert
            } else {
                colors.muted
            }),
        )),
        Line::from(Span::styled(
            format!("Status   {}", core.status),
            Style::default().fg(colors.text),
        )),
    ];

    let block = Paragraph::new(lines)
        .block(panel_block(
            "Summary",
            colors.panel_alt_bg,
            colors.text,
            colors.border,
        ))
        .wrap(Wrap { trim: true });
    frame.render_widget(block, area);
}

fn draw_chart(frame: &mut Frame, title: &str, rows: &[ChartRow], colors: &Palette, area: Rect) {
    let block = panel_block(title, colors.panel_bg, colors.text, colors.border);
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("no data", Style::default().fg(colors.muted)))
                .block(block),
            area,
        );
        return;
    }

    let lines = bar_lines(rows, area, colors);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_durations(frame: &mut Frame, core: &DashCore, colors: &Palette, area: Rect) {
    let view = &core.snapshot.durations;
    let block = panel_block("Durations", colors.panel_bg, colors.text, colors.border);

    if view.bins.is_empty() && view.stats.is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled("no data", Style::default().fg(colors.muted)))
                .block(block),
            area,
        );
        return;
    }

    let mut lines = bar_lines(&view.bins, area, colors);
    if let Some(stats) = &view.stats {
        lines.push(Line::from(Span::styled(
            format!(
                "n={}  mean={:.0}s  median={:.0}s  min={:.0}s  max={:.0}s",
                stats.count, stats.mean, stats.median, stats.min, stats.max
            ),
            Style::default().fg(colors.muted),
        )));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn bar_lines<'a>(rows: &'a [ChartRow], area: Rect, colors: &Palette) -> Vec<Line<'a>> {
    let visible = (area.height.saturating_sub(2)) as usize;
    let bar_width = (area.width as usize)
        .saturating_sub(BAR_LABEL_WIDTH + 10)
        .max(4);
    let max_count = rows.iter().map(|row| row.count).max().unwrap_or(1).max(1);

    rows.iter()
        .take(visible.max(1))
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", clip(&row.label), width = BAR_LABEL_WIDTH),
                    Style::default().fg(colors.text),
                ),
                Span::styled(
                    count_bar(row.count, max_count, bar_width),
                    Style::default().fg(colors.bar),
                ),
                Span::styled(
                    format!(" {}", row.count),
                    Style::default().fg(colors.muted),
                ),
            ])
        })
        .collect()
}

fn clip(label: &str) -> String {
    if label.chars().count() <= BAR_LABEL_WIDTH - 1 {
        return label.to_string();
    }
    let mut clipped: String = label.chars().take(BAR_LABEL_WIDTH - 2).collect();
    clipped.push('~');
    clipped
}

fn count_bar(count: u64, max_count: u64, width: usize) -> String {
    let ratio = (count as f64 / max_count as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let filled = if count > 0 { filled.max(1) } else { 0 };
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn draw_footer(frame: &mut Frame, core: &DashCore, colors: &Palette, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "Keys: Up/Down move, Enter filter, Esc all genres, r reload, q quit",
            Style::default().fg(colors.muted),
        ),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(core.status.as_str(), Style::default().fg(colors.text)),
    ]))
    .block(panel_block(
        "Message",
        colors.panel_bg,
        colors.text,
        colors.border,
    ));
    frame.render_widget(footer, area);
}

fn panel_block(title: &str, bg: Color, text: Color, border: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_count() {
        assert_eq!(count_bar(4, 4, 8), "########");
        assert_eq!(count_bar(2, 4, 8), "####----");
        assert_eq!(count_bar(0, 4, 8), "--------");
    }

    #[test]
    fn nonzero_counts_always_show_at_least_one_tick() {
        assert_eq!(count_bar(1, 1_000, 8), "#-------");
    }

    #[test]
    fn long_labels_are_clipped() {
        let clipped = clip("A Very Long Genre Name Indeed");
        assert!(clipped.ends_with('~'));
        assert!(clipped.chars().count() <= BAR_LABEL_WIDTH - 1);
    }
}
