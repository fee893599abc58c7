use anyhow::Result;
use chrono::{Datelike, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_tracker::{
    layout, AppConfig, ChartGeometry, ExpenseCategory, ExpenseRecord, ExpenseStore, NewExpense,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Chart canvas units per terminal cell, so pixel-sized margins stay proportionate
const UNITS_PER_CELL: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Expenses,
    Recent,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Expenses,
            Page::Expenses => Page::Recent,
            Page::Recent => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Recent,
            Page::Expenses => Page::Dashboard,
            Page::Recent => Page::Expenses,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Expenses => "Expenses",
            Page::Recent => "Recent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Description,
    Category,
}

impl FormField {
    fn next(&self) -> Self {
        match self {
            FormField::Amount => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Amount,
        }
    }
}

/// The add-expense form; validation happens here, not in the store
#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub amount: String,
    pub description: String,
    pub category: ExpenseCategory,
    pub field: FormField,
    pub error: Option<String>,
}

impl ExpenseForm {
    pub fn new(category: ExpenseCategory) -> Self {
        Self {
            amount: String::new(),
            description: String::new(),
            category,
            field: FormField::Amount,
            error: None,
        }
    }

    pub fn push(&mut self, c: char) {
        match self.field {
            FormField::Amount if c.is_ascii_digit() => self.amount.push(c),
            // A second separator is dropped, so "1.2.3" reads as "1.23"
            FormField::Amount if c == '.' && !self.amount.contains('.') => self.amount.push(c),
            FormField::Description => self.description.push(c),
            _ => {}
        }
    }

    pub fn pop(&mut self) {
        match self.field {
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Category => {}
        }
    }

    /// Parse and validate; on failure the message is kept for display
    pub fn submit(&mut self) -> Option<NewExpense> {
        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) => amount,
            Err(_) => {
                self.error = Some(format!("Amount is not a number: {:?}", self.amount));
                return None;
            }
        };

        let expense = NewExpense::new(amount, self.description.trim(), self.category);
        match expense.validate() {
            Ok(()) => Some(expense),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

pub struct App {
    pub store: ExpenseStore,
    pub config: AppConfig,
    pub state: TableState,
    pub current_page: Page,
    pub filter: Option<ExpenseCategory>,
    pub form: Option<ExpenseForm>,
    pub status: Option<String>,
    changed: Arc<AtomicBool>,
}

impl App {
    pub fn new(mut store: ExpenseStore, config: AppConfig) -> Self {
        let changed = Arc::new(AtomicBool::new(false));
        let flag = changed.clone();
        store.subscribe(move |_| flag.store(true, Ordering::Relaxed));

        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            config,
            state,
            current_page: Page::Dashboard,
            filter: None,
            form: None,
            status: None,
            changed,
        }
    }

    /// Rows on the current page, newest first
    pub fn visible_expenses(&self) -> Vec<&ExpenseRecord> {
        match self.current_page {
            Page::Recent => self.store.recent(self.config.recent_limit).iter().collect(),
            _ => self.store.filtered_by(self.filter),
        }
    }

    /// Dashboard list: the latest few, or the whole category once a filter is set
    pub fn dashboard_expenses(&self) -> Vec<&ExpenseRecord> {
        match self.filter {
            Some(_) => self.store.filtered_by(self.filter),
            None => self.store.recent(self.config.recent_limit).iter().collect(),
        }
    }

    pub fn chart(&self, area: Rect) -> ChartGeometry {
        layout(
            &self.store.category_totals(),
            area.width as f64 * UNITS_PER_CELL,
            area.height as f64 * UNITS_PER_CELL,
            &self.config.chart,
        )
    }

    pub fn set_filter(&mut self, filter: Option<ExpenseCategory>) {
        self.filter = filter;
        self.reset_selection();
    }

    pub fn next_filter(&mut self) {
        let next = match self.filter {
            None => Some(ExpenseCategory::ALL[0]),
            Some(c) if c == ExpenseCategory::ALL[ExpenseCategory::COUNT - 1] => None,
            Some(c) => Some(c.next()),
        };
        self.set_filter(next);
    }

    pub fn previous_filter(&mut self) {
        let previous = match self.filter {
            None => Some(ExpenseCategory::ALL[ExpenseCategory::COUNT - 1]),
            Some(c) if c == ExpenseCategory::ALL[0] => None,
            Some(c) => Some(c.previous()),
        };
        self.set_filter(previous);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.reset_selection();
    }

    pub fn open_form(&mut self) {
        self.form = Some(ExpenseForm::new(self.filter.unwrap_or(ExpenseCategory::Food)));
    }

    pub fn submit_form(&mut self) {
        let expense = match self.form.as_mut().and_then(|f| f.submit()) {
            Some(expense) => expense,
            None => return,
        };
        let record = self.store.add(expense);
        self.status = Some(format!(
            "Added {} ({:.2}, {})",
            record.description, record.amount, record.category
        ));
        self.form = None;
    }

    /// Pick up store notifications; newest row becomes the selection
    pub fn sync(&mut self) {
        if self.changed.swap(false, Ordering::Relaxed) {
            self.reset_selection();
        }
    }

    fn reset_selection(&mut self) {
        if self.visible_expenses().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_expenses().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_expenses().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal UI stopped with an error");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| ui(f, app))?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if app.form.is_some() {
            handle_form_key(app, key.code);
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab => app.next_page(),
            KeyCode::BackTab => app.previous_page(),
            KeyCode::Char('a') => app.open_form(),
            KeyCode::Char('f') => app.next_filter(),
            KeyCode::Char('F') => app.previous_filter(),
            KeyCode::Char('c') => app.set_filter(None),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.status = None
            }
            _ => {}
        }
    }
}

fn handle_form_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.form = None,
        KeyCode::Enter => app.submit_form(),
        code => {
            let form = match app.form.as_mut() {
                Some(form) => form,
                None => return,
            };
            match code {
                KeyCode::Tab => form.field = form.field.next(),
                KeyCode::Left if form.field == FormField::Category => {
                    form.category = form.category.previous()
                }
                KeyCode::Right if form.field == FormField::Category => {
                    form.category = form.category.next()
                }
                KeyCode::Backspace => form.pop(),
                KeyCode::Char(c) => form.push(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Expenses | Page::Recent => render_table(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if app.form.is_some() {
        render_form(f, f.size(), app);
    }
}

fn category_color(category: ExpenseCategory) -> Color {
    match category {
        ExpenseCategory::Food => Color::Green,
        ExpenseCategory::Transport => Color::Cyan,
        ExpenseCategory::Utilities => Color::Yellow,
        ExpenseCategory::Entertainment => Color::Magenta,
        ExpenseCategory::Other => Color::Gray,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Dashboard, Page::Expenses, Page::Recent];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {:.2}", app.store.total_all()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} expenses", app.store.len()),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    render_totals(f, columns[0], app);
    render_chart(f, right[0], app);
    render_dashboard_list(f, right[1], app);
}

fn render_dashboard_list(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.filter {
        Some(category) => format!(" {} Expenses (Filtered) ", category),
        None => " Recent Expenses ".to_string(),
    };

    let expenses = app.dashboard_expenses();
    let content: Vec<Line> = if expenses.is_empty() {
        vec![Line::from(Span::styled(
            match app.filter {
                Some(_) => "  No expenses in this category.",
                None => "  No expenses yet. Press a to add one.",
            },
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))]
    } else {
        expenses
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::raw(format!("  {}  ", r.date.format("%b %d"))),
                    Span::styled(
                        format!("{:<30}", truncate(&r.description, 30)),
                        Style::default().fg(category_color(r.category)),
                    ),
                    Span::raw(format!("{:>10.2}", r.amount)),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(paragraph, area);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    let this_month: f64 = app.store.between(month_start, today).iter().map(|r| r.amount).sum();

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total:      ", heading),
            Span::raw(format!("{:>12.2}", app.store.total_all())),
        ]),
        Line::from(vec![
            Span::styled("  This month: ", heading),
            Span::raw(format!("{:>12.2}", this_month)),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────"),
        Line::from(""),
    ];

    for total in app.store.category_totals() {
        let marker = if app.filter == Some(total.category) { "→ " } else { "  " };
        content.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{:<14}", total.category.as_str()),
                Style::default().fg(category_color(total.category)),
            ),
            Span::raw(format!("{:>12.2}", total.total)),
        ]));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Totals "),
    );

    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Spending by Category ");
    let inner = block.inner(area);
    let geometry = app.chart(inner);

    // Canvas y grows upwards; geometry y grows downwards
    let height = geometry.canvas_height;
    let step = UNITS_PER_CELL / 2.0;
    let label_y = (height - geometry.plot_height) / 2.0;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, geometry.canvas_width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for bar in &geometry.bars {
                let color = category_color(bar.category);
                let bottom = height - geometry.plot_height;
                let top = bottom + bar.height;
                let mut x = bar.x;
                while x <= bar.x + bar.width {
                    ctx.draw(&CanvasLine {
                        x1: x,
                        y1: bottom,
                        x2: x,
                        y2: top,
                        color,
                    });
                    x += step;
                }
            }
            ctx.layer();
            for tick in &geometry.y_axis_ticks {
                ctx.print(0.0, height - tick.y, format!("{:.0}", tick.value));
            }
            for bar in &geometry.bars {
                let label: String = bar.category.as_str().chars().take(5).collect();
                ctx.print(bar.x, label_y, label);
            }
        });

    f.render_widget(canvas, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Category", "Description", "Amount"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .visible_expenses()
        .into_iter()
        .map(|r| {
            let color = category_color(r.category);
            Row::new(vec![
                Cell::from(r.date.format("%Y-%m-%d").to_string()),
                Cell::from(r.category.as_str()).style(Style::default().fg(color)),
                Cell::from(truncate(&r.description, 40)),
                Cell::from(format!("{:>10.2}", r.amount)),
            ])
            .height(1)
        })
        .collect();

    let title = match (app.current_page, app.filter) {
        (Page::Recent, _) => format!(" Recent ({} most recent) ", app.config.recent_limit),
        (_, Some(category)) => format!(" Expenses - {} ", category),
        (_, None) => " Expenses - All ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(15),
            Constraint::Length(42),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(category) = app.filter {
        status_spans.push(Span::styled(
            format!(" Filter: {} ", category),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw("("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear) | "));
    }

    if let Some(status) = &app.status {
        status_spans.push(Span::styled(format!("{} | ", status), Style::default().fg(Color::Cyan)));
    }

    status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("f/F", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Filter | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = match &app.form {
        Some(form) => form,
        None => return,
    };

    let popup = centered(area, 50, 12);
    let label = |field: FormField, name: &'static str| {
        let style = if form.field == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Span::styled(name, style)
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            label(FormField::Amount, "  Amount:      "),
            Span::raw(form.amount.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            label(FormField::Description, "  Description: "),
            Span::raw(form.description.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            label(FormField::Category, "  Category:    "),
            Span::styled(
                format!("◀ {} ▶", form.category),
                Style::default().fg(category_color(form.category)),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        content.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    content.push(Line::from(Span::styled(
        "  Tab field · ←/→ category · Enter save · Esc cancel",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Expense "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(expenses: &[(f64, &str, ExpenseCategory)]) -> App {
        let mut store = ExpenseStore::new();
        for (amount, description, category) in expenses {
            store.add(NewExpense::new(*amount, *description, *category));
        }
        App::new(store, AppConfig::default())
    }

    #[test]
    fn test_form_rejects_invalid_input() {
        let mut form = ExpenseForm::new(ExpenseCategory::Food);
        assert!(form.submit().is_none());
        assert!(form.error.is_some());

        form.amount = "12.5".to_string();
        assert!(form.submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Description must not be empty"));

        form.description = "Lunch".to_string();
        let expense = form.submit().unwrap();
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, ExpenseCategory::Food);
    }

    #[test]
    fn test_form_amount_accepts_only_numbers() {
        let mut form = ExpenseForm::new(ExpenseCategory::Other);
        for c in "1a2.5x".chars() {
            form.push(c);
        }
        assert_eq!(form.amount, "12.5");
    }

    #[test]
    fn test_form_amount_keeps_a_single_decimal_point() {
        let mut form = ExpenseForm::new(ExpenseCategory::Other);
        for c in "1.2.3".chars() {
            form.push(c);
        }
        assert_eq!(form.amount, "1.23");

        form.pop();
        form.pop();
        form.pop();
        form.push('.');
        form.push('5');
        assert_eq!(form.amount, "1.5");
    }

    #[test]
    fn test_submit_adds_and_selects_newest() {
        let mut app = app_with(&[(5.0, "Tea", ExpenseCategory::Food)]);
        app.current_page = Page::Expenses;
        app.next();

        app.open_form();
        if let Some(form) = app.form.as_mut() {
            form.amount = "7".to_string();
            form.description = "Bus".to_string();
            form.category = ExpenseCategory::Transport;
        }
        app.submit_form();
        app.sync();

        assert!(app.form.is_none());
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.state.selected(), Some(0));
        assert_eq!(app.visible_expenses()[0].description, "Bus");
    }

    #[test]
    fn test_filter_cycles_through_all_and_back_to_none() {
        let mut app = app_with(&[]);
        let mut seen = vec![];
        for _ in 0..=ExpenseCategory::COUNT {
            app.next_filter();
            seen.push(app.filter);
        }
        assert_eq!(seen[0], Some(ExpenseCategory::Food));
        assert_eq!(seen[ExpenseCategory::COUNT], None);

        app.previous_filter();
        assert_eq!(app.filter, Some(ExpenseCategory::Other));
    }

    #[test]
    fn test_recent_page_uses_limit() {
        let expenses: Vec<(f64, &str, ExpenseCategory)> =
            (0..15).map(|_| (1.0, "x", ExpenseCategory::Other)).collect();
        let mut app = app_with(&expenses);
        app.config.recent_limit = 4;
        app.current_page = Page::Recent;

        assert_eq!(app.visible_expenses().len(), 4);
    }

    #[test]
    fn test_dashboard_list_switches_with_filter() {
        let expenses: Vec<(f64, &str, ExpenseCategory)> = (0..12)
            .map(|i| {
                let category = if i % 2 == 0 {
                    ExpenseCategory::Food
                } else {
                    ExpenseCategory::Other
                };
                (1.0, "x", category)
            })
            .collect();
        let mut app = app_with(&expenses);

        assert_eq!(app.dashboard_expenses().len(), 10);

        app.set_filter(Some(ExpenseCategory::Food));
        assert_eq!(app.dashboard_expenses().len(), 6);
        assert!(app.dashboard_expenses().iter().all(|r| r.category == ExpenseCategory::Food));
    }

    #[test]
    fn test_chart_uses_area_size() {
        let app = app_with(&[(10.0, "Tea", ExpenseCategory::Food)]);
        let geometry = app.chart(Rect::new(0, 0, 60, 20));

        assert_eq!(geometry.canvas_width, 600.0);
        assert_eq!(geometry.canvas_height, 200.0);
        assert_eq!(geometry.bars.len(), ExpenseCategory::COUNT);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long description", 8), "a lon...");
    }
}
