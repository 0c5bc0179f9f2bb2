//! Frame rendering

use ratatui::{prelude::*, widgets::*};
use tui_input::Input;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget, TuiWidgetState};

use menu_client::Speaker;
use shared::{MenuItem, OrderStatus};

use super::app::{App, Mode, Tab};
use super::forms::{AVAILABILITY_SLOT, EDIT_LABELS, EditForm, SETTINGS_LABELS, SettingsForm};
use crate::core::alert::banner_lines;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

const DEMO_BANNER: &str =
    "Demo Mode: Connect your Google Sheet in Settings to see real data. Showing sample data.";

pub fn availability_label(item: &MenuItem) -> &'static str {
    if item.available { "Available" } else { "Sold Out" }
}

pub fn status_color(status: OrderStatus) -> Color {
    match status {
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Preparing => Color::Blue,
        OrderStatus::Ready => Color::Green,
        OrderStatus::Delivered => Color::DarkGray,
    }
}

pub fn draw(f: &mut Frame, app: &App, logger_state: &TuiWidgetState) {
    let mut constraints = vec![Constraint::Length(3)];
    if app.demo_mode {
        constraints.push(Constraint::Length(1));
    }
    if app.snapshot.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.extend([Constraint::Min(5), Constraint::Length(8), Constraint::Length(1)]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    draw_header(f, app, take());
    if app.demo_mode {
        let banner = Paragraph::new(DEMO_BANNER).style(Style::default().fg(Color::Black).bg(Color::Yellow));
        f.render_widget(banner, take());
    }
    if let Some(error) = &app.snapshot.error {
        let banner = Paragraph::new(format!(" {error}"))
            .style(Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD));
        f.render_widget(banner, take());
    }

    let body = take();
    let logs = take();
    let footer = take();

    let content = if app.chat_open {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body);
        draw_chat(f, app, split[1]);
        split[0]
    } else {
        body
    };

    match app.tab {
        Tab::Menu => draw_menu(f, app, content),
        Tab::Orders => draw_orders(f, app, content),
    }

    draw_logs(f, logger_state, logs);
    draw_footer(f, app, footer);

    if let Some((headline, detail)) = banner_lines(&app.snapshot.new_orders) {
        draw_toast(f, &headline, &detail, body);
    }

    match &app.mode {
        Mode::Editing(form) => draw_edit_form(f, form),
        Mode::Settings(form) => draw_settings(f, form),
        _ => {}
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let tab_span = |tab: Tab, key: char| {
        let style = if app.tab == tab {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {key}:{} ", tab.title()), style)
    };

    let pending = app.snapshot.pending_count();
    let mut spans = vec![
        Span::styled(" MenuDesk ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        tab_span(Tab::Menu, '1'),
        Span::raw(" "),
        tab_span(Tab::Orders, '2'),
    ];
    if pending > 0 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {pending} pending "),
            Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if app.snapshot.loading {
        spans.push(Span::styled(
            format!("  {} syncing", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn draw_menu(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Menu ({}) ", app.snapshot.menu.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.snapshot.menu.is_empty() {
        let empty = Paragraph::new("No menu items found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .snapshot
        .menu
        .iter()
        .map(|item| {
            let badge_style = if item.available {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(item.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(format!("${}", item.price), Style::default().fg(Color::Yellow)),
                    Span::raw("  "),
                    Span::styled(format!("[{}]", availability_label(item)), badge_style),
                ]),
                Line::from(vec![
                    Span::styled(format!("  {} ", item.category), Style::default().fg(Color::Magenta)),
                    Span::styled(item.description.clone(), Style::default().fg(Color::Gray)),
                ]),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_orders(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Live Orders ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.snapshot.orders.is_empty() {
        let empty = Paragraph::new("No active orders found.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Time", "Table", "Items", "Total", "Status"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = app.snapshot.orders.iter().map(|order| {
        Row::new(vec![
            Cell::from(order.timestamp.clone()),
            Cell::from(format!("#{}", order.table_number)),
            Cell::from(order.items.clone()),
            Cell::from(format!("${}", order.total)),
            Cell::from(order.status.as_str()).style(Style::default().fg(status_color(order.status))),
        ])
    });

    let widths = [
        Constraint::Length(20),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn draw_chat(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.mode, Mode::Chat);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.chat.messages() {
        let (who, style) = match message.speaker {
            Speaker::User => ("You", Style::default().fg(Color::Cyan)),
            Speaker::Assistant => ("Assistant", Style::default().fg(Color::Green)),
        };
        lines.push(Line::from(Span::styled(format!("{who}:"), style.add_modifier(Modifier::BOLD))));
        lines.push(Line::from(message.text.clone()));
        lines.push(Line::from(""));
    }
    if app.chat.is_awaiting_reply() {
        lines.push(Line::from(Span::styled(
            format!("Assistant is typing {}", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the newest lines in view
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().title(" Menu Assistant ").borders(Borders::ALL).border_style(
            Style::default().fg(if focused { Color::Yellow } else { Color::Magenta }),
        ));
    f.render_widget(transcript, chunks[0]);

    draw_input(f, &app.chat_input, None, " Ask about the menu ", focused, chunks[1]);
}

/// Single-line input box; `display` overrides the drawn text (masking)
fn draw_input(f: &mut Frame, input: &Input, display: Option<String>, title: &str, focused: bool, area: Rect) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let text = display.unwrap_or_else(|| input.value().to_string());
    let widget = Paragraph::new(text)
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);

    if focused {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn draw_logs(f: &mut Frame, logger_state: &TuiWidgetState, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM))
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(logger_state);
    f.render_widget(logs, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hint = match &app.mode {
        Mode::Normal => "Tab/1/2 switch | r refresh | e edit | s settings | c chat | d dismiss | q quit",
        Mode::Editing(_) => "Tab next field | Space toggle availability | Enter save | Esc cancel",
        Mode::Settings(_) => "Tab next field | Enter save | Esc cancel",
        Mode::Chat => "Enter send | Esc close chat",
    };

    let mut spans = vec![Span::styled(hint, Style::default().fg(Color::DarkGray))];
    if let Some(notice) = &app.notice {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Green)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_toast(f: &mut Frame, headline: &str, detail: &str, body: Rect) {
    let width = (headline.len().max(detail.len()) as u16 + 4).min(body.width);
    let area = Rect {
        x: body.x + body.width.saturating_sub(width),
        y: body.y,
        width,
        height: 5.min(body.height),
    };

    let toast = Paragraph::new(vec![
        Line::from(Span::styled(headline.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(detail.to_string()),
        Line::from(Span::styled("press d to dismiss", Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .title(" New Order! ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(Clear, area);
    f.render_widget(toast, area);
}

/// Centered rect of fixed height
fn modal_area(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_rows(count: usize, area: Rect) -> std::rc::Rc<[Rect]> {
    let mut constraints = vec![Constraint::Length(3); count];
    constraints.push(Constraint::Min(0));
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area)
}

fn draw_edit_form(f: &mut Frame, form: &EditForm) {
    let area = modal_area(f.area(), 60, 22);
    f.render_widget(Clear, area);
    let title = if form.saving {
        format!(" Editing {} (saving...) ", form.original.name)
    } else {
        format!(" Editing {} ", form.original.name)
    };
    f.render_widget(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
        area,
    );

    let rows = field_rows(EDIT_LABELS.len() + 1, area);
    for (slot, label) in EDIT_LABELS.iter().enumerate() {
        draw_input(f, &form.fields[slot], None, label, form.focus == slot, rows[slot]);
    }

    let toggle_style = if form.focus == AVAILABILITY_SLOT {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mark = if form.available { "[x]" } else { "[ ]" };
    let mut lines = vec![Line::from(Span::styled(format!("{mark} Available in stock"), toggle_style))];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[AVAILABILITY_SLOT]);
}

fn draw_settings(f: &mut Frame, form: &SettingsForm) {
    let area = modal_area(f.area(), 60, 14);
    f.render_widget(Clear, area);
    f.render_widget(
        Block::default()
            .title(" Connection Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
        area,
    );

    let rows = field_rows(SETTINGS_LABELS.len(), area);
    for (slot, label) in SETTINGS_LABELS.iter().enumerate() {
        draw_input(
            f,
            &form.fields[slot],
            Some(form.display_value(slot)),
            label,
            form.focus == slot,
            rows[slot],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use shared::SheetConfig;

    use crate::core::Snapshot;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let logger_state = TuiWidgetState::new();
        terminal.draw(|f| draw(f, app, &logger_state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_modal_area_on_wide_terminal() {
        let area = modal_area(Rect::new(0, 0, 2000, 50), 60, 22);
        assert_eq!(area.width, 1200);
        assert_eq!(area.x, 400);
        assert_eq!(area.height, 22);

        let cramped = modal_area(Rect::new(0, 0, 40, 10), 60, 22);
        assert_eq!(cramped.width, 24);
        assert_eq!(cramped.height, 10);
        assert_eq!(cramped.y, 0);
    }

    #[test]
    fn test_empty_orders_message() {
        let mut app = App::new(SheetConfig::default().with_api_key("key"));
        app.tab = Tab::Orders;
        let screen = render(&app);
        assert!(screen.contains("No active orders found."));
        assert!(!screen.contains("Demo Mode"));
    }

    #[test]
    fn test_demo_and_error_banners() {
        let mut app = App::new(SheetConfig::default());
        app.snapshot = Snapshot {
            error: Some("Connection failed. Check Settings.".into()),
            ..Default::default()
        };
        let screen = render(&app);
        assert!(screen.contains("Demo Mode"));
        assert!(screen.contains("Connection failed. Check Settings."));
    }

    #[test]
    fn test_menu_cards_show_availability() {
        let mut app = App::new(SheetConfig::default());
        let mut menu = shared::demo::demo_menu();
        menu[1].available = false;
        app.snapshot.menu = menu;
        let screen = render(&app);
        assert!(screen.contains("Spicy Ramen"));
        assert!(screen.contains("[Sold Out]"));
        assert!(screen.contains("[Available]"));
    }
}
