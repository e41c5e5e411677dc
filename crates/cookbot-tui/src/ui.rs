use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use crate::app::App;
use cookbot_core::{Collaborator, Speaker};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                if !current_text.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut current_text)));
                }
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [status_area, chat_area, lists_area] = Layout::horizontal([
        Constraint::Length(24),
        Constraint::Min(30),
        Constraint::Percentage(35),
    ])
    .areas(body_area);

    render_header(frame, header_area);
    render_status(app, frame, status_area);
    render_chat(app, frame, chat_area);
    render_lists(app, frame, lists_area);
    render_footer(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" 🍳 Cookbot ", Style::default().fg(Color::LightYellow).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let health = app.conversation.health();

    let mut lines: Vec<Line> = Vec::new();
    for service in Collaborator::all() {
        let color = if health.get(service) { Color::Green } else { Color::Red };
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::raw(service.display_name()),
        ]));
    }

    if app.health_checking {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Checking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Services ");

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [history_area, input_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = history_area.height.saturating_sub(2);
    app.chat_width = history_area.width.saturating_sub(2);
    if app.follow_bottom {
        app.chat_scroll = app.max_chat_scroll();
    }

    let conversation = &app.conversation;
    let chat_text = if conversation.transcript_len() == 0 && !conversation.is_busy() {
        Text::from(Span::styled(
            "Ask for a recipe, or paste a YouTube cooking video link...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for turn in conversation.turns() {
            match turn.speaker {
                Speaker::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(turn.text.as_str()));
                }
                Speaker::Agent => {
                    lines.push(Line::from(Span::styled(
                        "Chef:",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    for line in turn.text.lines() {
                        lines.push(parse_markdown_line(line));
                    }
                }
            }
            lines.push(Line::default());
        }

        // The video placeholder already says what is going on
        if conversation.is_busy() && conversation.placeholder().is_none() {
            lines.push(Line::from(Span::styled(
                "Chef:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Chat ");

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, history_area);

    let input_style = if conversation.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Message (Enter to send) ");

    // Keep the cursor visible on long input by scrolling horizontally
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor = app.cursor;
    let offset = cursor.saturating_sub(inner_width.saturating_sub(1));
    let visible: String = app.input.chars().skip(offset).take(inner_width).collect();

    frame.render_widget(
        Paragraph::new(visible).style(input_style).block(input_block),
        input_area,
    );
    frame.set_cursor_position((
        input_area.x + 1 + (cursor - offset) as u16,
        input_area.y + 1,
    ));
}

fn render_lists(app: &App, frame: &mut Frame, area: Rect) {
    let [ingredients_area, recipe_area] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(area);

    let ingredients: Vec<ListItem> = app
        .conversation
        .ingredients()
        .iter()
        .map(|ingredient| {
            ListItem::new(Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Green)),
                Span::raw(ingredient.render()),
            ]))
        })
        .collect();

    let ingredients_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" 🛒 Ingredients ");

    if ingredients.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No ingredients yet",
                Style::default().fg(Color::DarkGray),
            ))
            .block(ingredients_block),
            ingredients_area,
        );
    } else {
        frame.render_widget(List::new(ingredients).block(ingredients_block), ingredients_area);
    }

    let recipe_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" 📖 Recipe ");

    let recipe_text = if app.conversation.recipe().is_empty() {
        Text::from(Span::styled(
            "No recipe yet",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let lines: Vec<Line> = app
            .conversation
            .recipe()
            .iter()
            .enumerate()
            .map(|(i, step)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}. ", i + 1),
                        Style::default().fg(Color::Magenta).bold(),
                    ),
                    Span::raw(step.as_str()),
                ])
            })
            .collect();
        Text::from(lines)
    };

    frame.render_widget(
        Paragraph::new(recipe_text)
            .block(recipe_block)
            .wrap(Wrap { trim: true }),
        recipe_area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" ^N ", key_style),
        Span::styled(" new chat ", label_style),
        Span::styled(" ^R ", key_style),
        Span::styled(" check services ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ];

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
