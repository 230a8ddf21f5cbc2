//! Read-only terminal view of the engine.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use super::actions::Command;
use super::logic::format_number;
use super::prestige::PrestigePhase;
use super::stage;
use super::state::Resource;
use super::Engine;

/// Below this width the log panel moves under the upgrades.
const WIDE_LAYOUT_COLS: u16 = 80;

pub fn render(engine: &Engine, f: &mut Frame, area: Rect) {
    let visible = stage::visible_resources(engine.state().current_stage);
    let resource_height = visible.len() as u16 + 3;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(resource_height),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(engine, f, rows[0]);
    render_resources(engine, &visible, f, rows[1]);

    let (main, log) = if area.width >= WIDE_LAYOUT_COLS {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        (cols[0], cols[1])
    } else {
        let stacked = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(6)])
            .split(rows[2]);
        (stacked[0], stacked[1])
    };

    if engine.prestige_phase() == PrestigePhase::Offered {
        render_prestige_offer(engine, f, main);
    } else {
        render_upgrades(engine, f, main);
    }
    render_log(engine, f, log);
    render_help(engine, f, rows[3]);
}

fn render_header(engine: &Engine, f: &mut Frame, area: Rect) {
    let state = engine.state();
    let current = engine.current_stage();

    let mut title = vec![Span::styled(
        format!(" Stage {}: {} ", current.id, current.product_name),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if state.prestige.simulation_depth > 0 {
        title.push(Span::styled(
            format!("  depth {}", state.prestige.simulation_depth),
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(next) = stage::next_stage(current.id) {
        title.push(Span::styled(
            format!(
                "  next at ${}",
                format_number(next.unlock_threshold)
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(
            format!(" » {}", engine.headline()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Singularity "),
    );
    f.render_widget(widget, area);
}

fn render_resources(engine: &Engine, visible: &[Resource], f: &mut Frame, area: Rect) {
    let state = engine.state();
    let bonuses = engine.bonuses();
    let rates = bonuses.production_rates();
    let current = engine.current_stage();

    let mut lines: Vec<Line> = visible
        .iter()
        .map(|&r| {
            let label = match r {
                Resource::Product => current.product_name,
                other => other.name(),
            };
            let mut spans = vec![
                Span::styled(format!(" {label:<22}"), Style::default().fg(Color::White)),
                Span::styled(
                    format_number(state.resources.get(r)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ];
            let rate = rates.get(r);
            if rate > 0.0 {
                spans.push(Span::styled(
                    format!("  +{}/s", format_number(rate)),
                    Style::default().fg(Color::Green),
                ));
            }
            Line::from(spans)
        })
        .collect();

    lines.push(Line::from(Span::styled(
        format!(
            " {} per click · ${} per {} sold",
            format_number(bonuses.click_yield()),
            format_number(bonuses.sale_price(current)),
            format_number(current.product_per_sale),
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Resources "),
    );
    f.render_widget(widget, area);
}

fn render_upgrades(engine: &Engine, f: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = engine
        .available_upgrades()
        .iter()
        .enumerate()
        .map(|(row, view)| {
            let key = Command::key_for_row(row)
                .map(|k| format!(" [{k}] "))
                .unwrap_or_else(|| "     ".to_string());
            let (name_style, cost_text) = if view.maxed {
                (Style::default().fg(Color::DarkGray), "MAX".to_string())
            } else if view.affordable {
                (
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    cost_label(view.cost, view.upgrade.cost_resource),
                )
            } else {
                (
                    Style::default().fg(Color::Gray),
                    cost_label(view.cost, view.upgrade.cost_resource),
                )
            };
            let cost_color = if view.affordable { Color::Green } else { Color::Red };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(key, Style::default().fg(Color::Yellow)),
                    Span::styled(format!("{} ", view.upgrade.name), name_style),
                    Span::styled(format!("({}) ", view.count), Style::default().fg(Color::DarkGray)),
                    Span::styled(cost_text, Style::default().fg(cost_color)),
                ]),
                Line::from(Span::styled(
                    format!("      {}", view.upgrade.description),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let widget = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Upgrades "),
    );
    f.render_widget(widget, area);
}

fn cost_label(cost: f64, resource: Resource) -> String {
    match resource {
        Resource::Dollars => format!("${}", format_number(cost)),
        other => format!("{} {}", format_number(cost), other.name()),
    }
}

fn render_prestige_offer(engine: &Engine, f: &mut Frame, area: Rect) {
    let depth = engine.state().prestige.simulation_depth + 1;
    let next = super::state::PermanentBonuses::for_depth(depth);
    let lines = vec![
        Line::from(Span::styled(
            "Is any of this real?",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Restart inside simulation depth {depth}. Resources, upgrades and stage are lost."
        )),
        Line::from(format!(
            "Permanent: production ×{:.2}, costs -{:.0}%",
            next.production_multiplier,
            next.cost_reduction * 100.0
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Y] go deeper   [N] not yet",
            Style::default().fg(Color::Yellow),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Question Reality "),
        );
    f.render_widget(widget, area);
}

fn render_log(engine: &Engine, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first.
    let lines: Vec<Line> = engine
        .log()
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Log "),
    );
    f.render_widget(widget, area);
}

fn render_help(engine: &Engine, f: &mut Frame, area: Rect) {
    let click_label = engine.current_stage().click_label;
    let text = match engine.prestige_phase() {
        PrestigePhase::Offered => "[Y] confirm  [N] decline".to_string(),
        PrestigePhase::Unlocked => format!("[C] {click_label}  [1-9] buy  [P] prestige  [S] save"),
        PrestigePhase::Locked => format!("[C] {click_label}  [1-9] buy  [S] save"),
    };
    let widget = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}
