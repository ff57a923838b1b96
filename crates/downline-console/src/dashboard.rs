//! Interactive team dashboard TUI.
//!
//! Renders the binary organization tree with pan/zoom, summary metrics,
//! the selected member's detail card, and an event log, with a command
//! input line at the bottom. Single-threaded and synchronous: each loop
//! iteration applies pending host actions, draws a frame, then polls
//! for one input event with a tick timeout.

use std::collections::HashMap;
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use downline_model::{write_roster, MemberId, OrgTree};
use downline_view::{
    ContextAction, MemberDetails, PanDirection, TreeLayout, ViewFilters, ViewState, NODE_WIDTH,
};

use crate::config::ConsoleConfig;
use crate::event_log::{EventLog, LogCategory};
use crate::host::Host;

/// Pan offsets use the embedding contract's pixel units; the projection
/// converts them to terminal cells.
const PAN_PX_PER_COL: i32 = 10;
const PAN_PX_PER_ROW: i32 = 25;
/// Below this zoom the tree renders compact single-line nodes.
const COMPACT_ZOOM: f64 = 0.8;

/// Screen geometry of the current tree projection, relative to the
/// tree panel's inner rect.
struct Projection {
    origin_x: i64,
    origin_y: i64,
    zoom: f64,
    rows_per_level: u16,
    node_height: u16,
}

impl Projection {
    fn col(&self, layout_x: i64) -> i64 {
        self.origin_x + (layout_x as f64 * self.zoom).round() as i64
    }

    fn row_top(&self, row: u32) -> i64 {
        self.origin_y + row as i64 * self.rows_per_level as i64
    }
}

/// The dashboard TUI state.
pub struct Dashboard {
    host: Host,
    view: ViewState,
    filters: ViewFilters,
    log: EventLog,
    /// Current text in the input field.
    input: String,
    /// Cursor position within the input field.
    cursor_pos: usize,
    /// Command history for up/down arrow navigation.
    history: Vec<String>,
    /// Current position in history (None = current input).
    history_pos: Option<usize>,
    /// Last-rendered tree panel area, cached for mouse hit-testing.
    tree_area: Rect,
    /// Last-rendered context menu area, if one is open.
    menu_area: Option<Rect>,
    /// Origin of an in-progress drag gesture.
    drag_from: Option<(u16, u16)>,
}

impl Dashboard {
    pub fn new(tree: OrgTree, config: &ConsoleConfig) -> Self {
        let mut filters = ViewFilters {
            show_inactive: config.view.show_inactive,
            ..ViewFilters::default()
        };
        filters.set_max_level(config.view.max_level);

        let mut log = EventLog::new();
        log.push(
            LogCategory::Help,
            "Downline dashboard ready. Type a name fragment and press Enter to search.",
        );
        log.push(
            LogCategory::Help,
            "Commands: /help, /select, /depth, /zoom, /quit",
        );

        Self {
            host: Host::new(tree),
            view: ViewState::new(),
            filters,
            log,
            input: String::new(),
            cursor_pos: 0,
            history: Vec::new(),
            history_pos: None,
            tree_area: Rect::default(),
            menu_area: None,
            drag_from: None,
        }
    }

    fn layout(&self) -> TreeLayout {
        TreeLayout::compute(self.host.tree(), self.host.view_root(), &self.filters)
    }

    /// Apply every host action the view emitted since the last frame.
    fn pump_actions(&mut self) {
        for action in self.view.drain_actions() {
            self.host.apply(action, &mut self.log);
        }
    }

    fn projection(&self, layout: &TreeLayout) -> Projection {
        let inner = inner_rect(self.tree_area);
        let zoom = self.view.zoom();
        let (rows_per_level, node_height) = if zoom < COMPACT_ZOOM { (3, 1) } else { (4, 2) };
        let scaled_w = (layout.width as f64 * zoom).round() as i64;
        let (pan_x, pan_y) = self.view.pan();
        Projection {
            origin_x: ((inner.width as i64 - scaled_w) / 2).max(0)
                + (pan_x / PAN_PX_PER_COL) as i64,
            origin_y: 1 + (pan_y / PAN_PX_PER_ROW) as i64,
            zoom,
            rows_per_level,
            node_height,
        }
    }

    /// Resolve an absolute screen position to the member box under it.
    fn node_at(&self, layout: &TreeLayout, col: u16, row: u16) -> Option<MemberId> {
        let inner = inner_rect(self.tree_area);
        if !rect_contains(inner, col, row) {
            return None;
        }
        let proj = self.projection(layout);
        let rel_col = col as i64 - inner.x as i64;
        let rel_row = row as i64 - inner.y as i64;
        let dy = rel_row - proj.origin_y;
        if dy < 0 {
            return None;
        }
        if dy % proj.rows_per_level as i64 >= proj.node_height as i64 {
            return None;
        }
        let level_row = (dy / proj.rows_per_level as i64) as u32;
        let layout_x = ((rel_col - proj.origin_x) as f64 / proj.zoom).round() as i64;
        layout.hit_test(layout_x, level_row).map(|n| n.id.clone())
    }

    // ── Rendering ──

    fn render(&mut self, frame: &mut Frame) {
        let layout = self.layout();
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(10),   // Tree + side panels
                Constraint::Length(5), // Input area
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0]);
        self.render_main_area(frame, outer[1], &layout);
        self.render_input(frame, outer[2]);
        self.render_context_menu(frame);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Downline Team Dashboard ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let tree = self.host.tree();
        let root_name = tree.root_record().name.clone();
        let legs = tree.leg_counts(tree.root_id());
        let status_line = Line::from(vec![
            Span::styled("  Organization: ", Style::default().fg(Color::Gray)),
            Span::styled(root_name, Style::default().fg(Color::White)),
            Span::styled("  |  Members: ", Style::default().fg(Color::Gray)),
            Span::styled(tree.len().to_string(), Style::default().fg(Color::Green)),
            Span::styled("  |  Legs: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("L {} / R {}", legs.left, legs.right),
                Style::default().fg(Color::LightCyan),
            ),
            Span::styled("  |  Zoom: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.0}%", self.view.zoom() * 100.0),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled("  |  Filters: ", Style::default().fg(Color::Gray)),
            Span::styled(self.filters.summary(), Style::default().fg(Color::Yellow)),
        ]);

        frame.render_widget(Paragraph::new(status_line).block(block), area);
    }

    fn render_main_area(&mut self, frame: &mut Frame, area: Rect, layout: &TreeLayout) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(62), // Tree
                Constraint::Percentage(38), // Metrics + details + log
            ])
            .split(area);

        self.render_tree(frame, columns[0], layout);

        let right_column = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),  // Metrics
                Constraint::Min(10),    // Detail panel
                Constraint::Length(8),  // Event log
            ])
            .split(columns[1]);

        self.render_metrics(frame, right_column[0]);
        self.render_details(frame, right_column[1]);
        self.render_log(frame, right_column[2]);
    }

    /// Render the tree panel: projected node boxes plus box-drawing
    /// connectors, panned and zoomed by the view state.
    fn render_tree(&mut self, frame: &mut Frame, area: Rect, layout: &TreeLayout) {
        self.tree_area = area;
        let title = if self.host.view_root() == self.host.tree().root_id() {
            " Team Tree ".to_string()
        } else {
            let name = self
                .host
                .tree()
                .get(self.host.view_root())
                .map(|r| r.name.clone())
                .unwrap_or_default();
            format!(" Downline of {name} (/root to return) ")
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if layout.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No members match the current filters.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "  /search clears the term, /inactive on shows everyone.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]);
            frame.render_widget(hint, inner);
            return;
        }

        let proj = self.projection(layout);
        let mut canvas = Canvas::new(inner.width, inner.height);
        let edge_style = Style::default().fg(Color::DarkGray);

        // Connectors first; node boxes draw over them.
        let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
        for edge in &layout.edges {
            children_of.entry(edge.parent).or_default().push(edge.child);
        }
        for (&parent, children) in &children_of {
            let p = &layout.nodes[parent];
            let pc = proj.col(p.center);
            let stub_line = proj.row_top(p.row) + proj.node_height as i64;
            let bar_line = stub_line + 1;
            canvas.put_char(stub_line, pc, '│', edge_style);

            let child_cols: Vec<i64> = children
                .iter()
                .map(|&c| proj.col(layout.nodes[c].center))
                .collect();
            let lo = child_cols.iter().copied().min().unwrap_or(pc).min(pc);
            let hi = child_cols.iter().copied().max().unwrap_or(pc).max(pc);
            canvas.hline(bar_line, lo, hi, '─', edge_style);
            for &cc in &child_cols {
                let corner = match cc.cmp(&pc) {
                    std::cmp::Ordering::Less => '┌',
                    std::cmp::Ordering::Greater => '┐',
                    std::cmp::Ordering::Equal => '│',
                };
                canvas.put_char(bar_line, cc, corner, edge_style);
            }
            if child_cols.iter().any(|&cc| cc != pc) {
                canvas.put_char(bar_line, pc, '┴', edge_style);
            }
        }

        let compact = proj.node_height == 1;
        let box_w = ((NODE_WIDTH as f64 * proj.zoom).round() as usize).max(6);
        for node in &layout.nodes {
            let y = proj.row_top(node.row);
            let center = proj.col(node.center);
            let selected = self.view.selected() == Some(&node.id);

            let name = truncate(&node.name, box_w.saturating_sub(2));
            let label_w = name.chars().count() as i64 + 2;
            let start = center - label_w / 2;
            let dot_style = if node.is_active {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let name_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if node.is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            canvas.put_char(y, start, '●', dot_style);
            canvas.put_str(y, start + 2, &name, name_style);

            if !compact {
                let rank = truncate(&node.rank, box_w);
                let rank_start = center - rank.chars().count() as i64 / 2;
                let rank_style = if node.is_active {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                canvas.put_str(y + 1, rank_start, &rank, rank_style);
            }
        }

        frame.render_widget(Paragraph::new(canvas.into_lines()), inner);
    }

    fn render_metrics(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Team Metrics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightBlue));

        let tree = self.host.tree();
        let legs = tree.leg_counts(tree.root_id());
        let total_legs = legs.total();
        let (left_pct, right_pct) = if total_legs > 0 {
            (
                (legs.left * 100 + total_legs / 2) / total_legs,
                (legs.right * 100 + total_legs / 2) / total_legs,
            )
        } else {
            (0, 0)
        };
        let spread = left_pct.abs_diff(right_pct);

        let text = vec![
            Line::from(vec![
                Span::styled("  Members: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} ({} active)", tree.len(), tree.active_count()),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Left leg: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} ({left_pct}%)", legs.left),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Right leg: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} ({right_pct}%)", legs.right),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Leg spread: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{spread}%"),
                    Style::default().fg(if spread > 20 {
                        Color::Red
                    } else {
                        Color::Yellow
                    }),
                ),
            ]),
        ];

        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Member Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let details = self
            .view
            .selected()
            .and_then(|id| MemberDetails::project(self.host.tree(), id));
        let Some(details) = details else {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Click a member (or /select <name>)",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "  to see their details here.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "  Right-click a member for actions.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(block);
            frame.render_widget(hint, area);
            return;
        };

        let status = if details.is_active {
            Span::styled("● Active", Style::default().fg(Color::Green))
        } else {
            Span::styled("● Inactive", Style::default().fg(Color::DarkGray))
        };
        let phone = if details.phone.is_empty() {
            "-".to_string()
        } else {
            details.phone.clone()
        };
        let text = vec![
            Line::from(vec![
                Span::styled(
                    format!("  {} ", details.name),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                status,
            ]),
            Line::from(Span::styled(
                format!("  {}", details.rank),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", details.email),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("  {phone}"),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("  Joined {}", details.joined),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("  Team size: {} members", details.team_size),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  /downline  focus the tree here",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "  /contact   reach out",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Events ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner_height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .log
            .tail(inner_height)
            .map(|entry| {
                let color = match entry.category {
                    LogCategory::Action => Color::White,
                    LogCategory::View => Color::Cyan,
                    LogCategory::Roster => Color::Yellow,
                    LogCategory::Help => Color::DarkGray,
                    LogCategory::Error => Color::Red,
                };
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", entry.timestamp.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.message.clone(), Style::default().fg(color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let (title, placeholder) = if self.host.pending_add().is_some() {
            (
                " New Member Name (Enter = create, Esc = cancel) ",
                "Type the new member's name...",
            )
        } else {
            (
                " Search / Command (Enter = search, /help = commands) ",
                "Type a name fragment or /command...",
            )
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let input_display = if self.input.is_empty() {
            Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Green)),
                Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Green)),
                Span::styled(self.input.clone(), Style::default().fg(Color::White)),
            ])
        };

        let hint_line = Line::from(Span::styled(
            "  Ctrl+C or /quit to exit  |  click select, right-click menu  |  +/- zoom, Ctrl+arrows pan, Tab cycle",
            Style::default().fg(Color::DarkGray),
        ));

        let paragraph =
            Paragraph::new(vec![Line::from(""), input_display, hint_line]).block(block);
        frame.render_widget(paragraph, area);

        let cursor_x = area.x + 4 + self.cursor_pos as u16;
        let cursor_y = area.y + 2;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    /// Render the context menu popup over everything else and cache its
    /// area for click routing.
    fn render_context_menu(&mut self, frame: &mut Frame) {
        self.menu_area = None;
        let Some(menu) = self.view.context_menu() else {
            return;
        };
        let member_name = self
            .host
            .tree()
            .get(&menu.member)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| menu.member.to_string());

        let labels: Vec<String> = menu.actions.iter().map(|a| menu_label(*a)).collect();
        let width = labels
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(member_name.chars().count() + 2))
            .max()
            .unwrap_or(12) as u16
            + 4;
        let height = labels.len() as u16 + 2;

        let frame_area = frame.area();
        let x = menu.at.0.min(frame_area.width.saturating_sub(width));
        let y = menu.at.1.min(frame_area.height.saturating_sub(height));
        let area = Rect::new(x, y, width, height);

        let lines: Vec<Line> = labels
            .iter()
            .map(|label| {
                Line::from(Span::styled(
                    format!(" {label}"),
                    Style::default().fg(Color::White),
                ))
            })
            .collect();
        let block = Block::default()
            .title(format!(" {member_name} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
        self.menu_area = Some(area);
    }

    // ── Input handling ──

    /// Handle keyboard input. Returns `true` if the dashboard should
    /// exit.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Up, KeyModifiers::CONTROL) => self.view.nudge(PanDirection::Up),
            (KeyCode::Down, KeyModifiers::CONTROL) => self.view.nudge(PanDirection::Down),
            (KeyCode::Left, KeyModifiers::CONTROL) => self.view.nudge(PanDirection::Left),
            (KeyCode::Right, KeyModifiers::CONTROL) => self.view.nudge(PanDirection::Right),
            (KeyCode::Char(c), _) => {
                if self.input.is_empty() && matches!(c, '+' | '=') {
                    self.view.zoom_in();
                } else if self.input.is_empty() && c == '-' {
                    self.view.zoom_out();
                } else {
                    self.input.insert(self.cursor_pos, c);
                    self.cursor_pos += 1;
                }
            }
            (KeyCode::Backspace, _) => {
                if self.cursor_pos > 0 {
                    self.input.remove(self.cursor_pos - 1);
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor_pos < self.input.len() {
                    self.input.remove(self.cursor_pos);
                }
            }
            (KeyCode::Left, _) => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Right, _) => {
                if self.cursor_pos < self.input.len() {
                    self.cursor_pos += 1;
                }
            }
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.input.len(),
            (KeyCode::Up, _) => {
                if !self.history.is_empty() {
                    let pos = match self.history_pos {
                        Some(p) if p > 0 => p - 1,
                        Some(p) => p,
                        None => self.history.len() - 1,
                    };
                    self.history_pos = Some(pos);
                    self.input = self.history[pos].clone();
                    self.cursor_pos = self.input.len();
                }
            }
            (KeyCode::Down, _) => {
                if let Some(pos) = self.history_pos {
                    if pos + 1 < self.history.len() {
                        let new_pos = pos + 1;
                        self.history_pos = Some(new_pos);
                        self.input = self.history[new_pos].clone();
                        self.cursor_pos = self.input.len();
                    } else {
                        self.history_pos = None;
                        self.input.clear();
                        self.cursor_pos = 0;
                    }
                }
            }
            (KeyCode::Tab, _) => self.cycle_selection(),
            (KeyCode::Esc, _) => {
                if self.view.context_menu().is_some() {
                    self.view.close_context_menu();
                } else if self.host.cancel_pending_add() {
                    self.log.push(LogCategory::Action, "Add member cancelled");
                } else if self.view.selected().is_some() {
                    self.view.clear_selection();
                } else {
                    self.input.clear();
                    self.cursor_pos = 0;
                }
            }
            (KeyCode::PageUp, _) => self.view.nudge(PanDirection::Up),
            (KeyCode::PageDown, _) => self.view.nudge(PanDirection::Down),
            (KeyCode::Enter, _) => return self.process_input(),
            _ => {}
        }
        false
    }

    /// Handle mouse input: click to select, right-click for the context
    /// menu, drag to pan, scroll to zoom. Any press outside an open
    /// menu closes it before anything else happens.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(menu_area) = self.menu_area {
                    if rect_contains(menu_area, pos.0, pos.1) {
                        self.click_menu_item(menu_area, pos.1);
                    } else {
                        self.view.outside_click();
                    }
                    return;
                }
                let layout = self.layout();
                if let Some(member) = self.node_at(&layout, pos.0, pos.1) {
                    self.view.click_member(member);
                } else {
                    self.drag_from = Some(pos);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((fx, fy)) = self.drag_from {
                    let dx = (pos.0 as i32 - fx as i32) * PAN_PX_PER_COL;
                    let dy = (pos.1 as i32 - fy as i32) * PAN_PX_PER_ROW;
                    self.view.pan_by(dx, dy);
                    self.drag_from = Some(pos);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            MouseEventKind::Down(MouseButton::Right) => {
                if self.menu_area.is_some() {
                    self.view.outside_click();
                }
                let layout = self.layout();
                if let Some(member) = self.node_at(&layout, pos.0, pos.1) {
                    let child_count = self.host.tree().child_count(&member);
                    self.view.open_context_menu(pos, member, child_count);
                }
            }
            MouseEventKind::ScrollUp => self.view.zoom_in(),
            MouseEventKind::ScrollDown => self.view.zoom_out(),
            _ => {}
        }
    }

    fn click_menu_item(&mut self, menu_area: Rect, row: u16) {
        let Some(menu) = self.view.context_menu() else {
            return;
        };
        let index = (row as i32 - menu_area.y as i32 - 1).max(-1);
        if index < 0 {
            return;
        }
        if let Some(action) = menu.actions.get(index as usize).copied() {
            self.view.invoke_context_action(action);
        }
    }

    /// Tab cycles the selection through the visible nodes in layout
    /// order; each stop behaves like a click.
    fn cycle_selection(&mut self) {
        let layout = self.layout();
        if layout.is_empty() {
            return;
        }
        let next = match self.view.selected().and_then(|id| layout.index_of(id)) {
            Some(i) => (i + 1) % layout.nodes.len(),
            None => 0,
        };
        self.view.click_member(layout.nodes[next].id.clone());
    }

    // ── Command processing ──

    /// Process the input line. Returns `true` if the dashboard should
    /// exit.
    fn process_input(&mut self) -> bool {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            // Empty Enter just dismisses transient UI.
            self.view.outside_click();
            return false;
        }
        self.history.push(input.clone());
        self.history_pos = None;
        self.input.clear();
        self.cursor_pos = 0;

        if input.starts_with('/') {
            self.process_command(&input)
        } else if self.host.pending_add().is_some() {
            self.host.complete_add(&input, &mut self.log);
            false
        } else {
            self.filters.set_search(&input);
            self.log
                .push(LogCategory::View, format!("Searching for \"{input}\""));
            false
        }
    }

    fn process_command(&mut self, cmd: &str) -> bool {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).copied().unwrap_or("").trim();

        match command {
            "/help" => {
                let help = [
                    "Available commands:",
                    "  <text>            - Search members by name (empty /search clears)",
                    "  /search [term]    - Same as typing text; no term clears the filter",
                    "  /inactive on|off  - Show or hide inactive members",
                    "  /depth <n>        - Limit the visible tree depth (n >= 1)",
                    "  /zoom in|out|<pct>- Zoom the tree view (50-150)",
                    "  /reset            - Reset zoom and pan",
                    "  /select <name>    - Select the first member matching a name",
                    "  /menu             - Open the action menu for the selection",
                    "  /add <name>       - Name the member for a pending placement",
                    "  /downline         - Focus the tree on the selected member",
                    "  /contact          - Contact the selected member",
                    "  /root             - Return the tree to the organization root",
                    "  /save <path>      - Write the roster to a JSON file",
                    "  /quit             - Exit the dashboard",
                ];
                for line in help {
                    self.log.push(LogCategory::Help, line);
                }
            }
            "/search" => {
                self.filters.set_search(args);
                if args.is_empty() {
                    self.log.push(LogCategory::View, "Search cleared");
                } else {
                    self.log
                        .push(LogCategory::View, format!("Searching for \"{args}\""));
                }
            }
            "/inactive" => match args {
                "on" | "show" => {
                    self.filters.show_inactive = true;
                    self.log.push(LogCategory::View, "Showing inactive members");
                }
                "off" | "hide" => {
                    self.filters.show_inactive = false;
                    self.log.push(LogCategory::View, "Hiding inactive members");
                }
                _ => {
                    self.log
                        .push(LogCategory::Error, "Usage: /inactive on|off");
                }
            },
            "/depth" => match args.parse::<u32>() {
                Ok(n) if n >= 1 => {
                    self.filters.set_max_level(n);
                    self.log
                        .push(LogCategory::View, format!("Max depth set to {n}"));
                }
                _ => {
                    self.log.push(LogCategory::Error, "Usage: /depth <n> (n >= 1)");
                }
            },
            "/zoom" => match args {
                "in" => self.view.zoom_in(),
                "out" => self.view.zoom_out(),
                _ => match args.trim_end_matches('%').parse::<u32>() {
                    Ok(pct) if (50..=150).contains(&pct) => {
                        self.view.set_zoom(pct as f64 / 100.0);
                        self.log
                            .push(LogCategory::View, format!("Zoom set to {pct}%"));
                    }
                    _ => {
                        self.log
                            .push(LogCategory::Error, "Usage: /zoom in|out|<50-150>");
                    }
                },
            },
            "/reset" => {
                self.view.set_zoom(1.0);
                let (px, py) = self.view.pan();
                self.view.pan_by(-px, -py);
                self.log.push(LogCategory::View, "Viewport reset");
            }
            "/select" => {
                if args.is_empty() {
                    self.log.push(LogCategory::Error, "Usage: /select <name>");
                } else {
                    match self.find_member(args) {
                        Some(member) => self.view.click_member(member),
                        None => {
                            self.log
                                .push(LogCategory::Error, format!("No member matches \"{args}\""));
                        }
                    }
                }
            }
            "/menu" => self.open_menu_for_selection(),
            "/add" => {
                if args.is_empty() {
                    self.log.push(LogCategory::Error, "Usage: /add <name>");
                } else {
                    self.host.complete_add(args, &mut self.log);
                }
            }
            "/downline" => {
                if self.view.selected().is_some() {
                    self.view.view_downline();
                } else {
                    self.log
                        .push(LogCategory::Error, "Select a member first (/select <name>)");
                }
            }
            "/contact" => {
                if self.view.selected().is_some() {
                    self.view.contact_selected();
                } else {
                    self.log
                        .push(LogCategory::Error, "Select a member first (/select <name>)");
                }
            }
            "/root" => {
                self.host.reset_view_root();
                self.log
                    .push(LogCategory::View, "Tree returned to the organization root");
            }
            "/save" => {
                if args.is_empty() {
                    self.log.push(LogCategory::Error, "Usage: /save <path>");
                } else {
                    match write_roster(Path::new(args), self.host.tree()) {
                        Ok(()) => {
                            self.log
                                .push(LogCategory::Roster, format!("Roster saved to {args}"));
                        }
                        Err(err) => {
                            self.log
                                .push(LogCategory::Error, format!("Save failed: {err}"));
                        }
                    }
                }
            }
            "/quit" | "/exit" | "/q" => return true,
            _ => {
                self.log.push(
                    LogCategory::Error,
                    format!("Unknown command: {command}. Type /help for available commands."),
                );
            }
        }
        false
    }

    /// First member (pre-order) whose name contains `term`,
    /// case-insensitively.
    fn find_member(&self, term: &str) -> Option<MemberId> {
        let needle = term.to_lowercase();
        let tree = self.host.tree();
        tree.member_ids()
            .find(|id| {
                tree.get(id)
                    .map(|r| r.name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Keyboard path to the context menu: anchor it at the selected
    /// member's projected node box.
    fn open_menu_for_selection(&mut self) {
        let Some(member) = self.view.selected().cloned() else {
            self.log
                .push(LogCategory::Error, "Select a member first (/select <name>)");
            return;
        };
        let layout = self.layout();
        let inner = inner_rect(self.tree_area);
        let proj = self.projection(&layout);
        let at = layout
            .index_of(&member)
            .map(|i| {
                let node = &layout.nodes[i];
                let x = (inner.x as i64 + proj.col(node.center)).clamp(0, u16::MAX as i64);
                let y = (inner.y as i64 + proj.row_top(node.row) + proj.node_height as i64)
                    .clamp(0, u16::MAX as i64);
                (x as u16, y as u16)
            })
            .unwrap_or((inner.x + 2, inner.y + 2));
        let child_count = self.host.tree().child_count(&member);
        self.view.open_context_menu(at, member, child_count);
    }
}

fn menu_label(action: ContextAction) -> String {
    match action {
        ContextAction::AddMember(position) => format!("Add Member ({position})"),
        other => other.label().to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

fn inner_rect(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn rect_contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// Character/style buffer the tree panel is composed into before being
/// handed to ratatui as styled lines.
struct Canvas {
    width: i64,
    height: i64,
    cells: Vec<(char, Style)>,
}

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as i64,
            height: height as i64,
            cells: vec![(' ', Style::default()); width as usize * height as usize],
        }
    }

    fn put_char(&mut self, line: i64, col: i64, ch: char, style: Style) {
        if line >= 0 && line < self.height && col >= 0 && col < self.width {
            self.cells[(line * self.width + col) as usize] = (ch, style);
        }
    }

    fn put_str(&mut self, line: i64, col: i64, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.put_char(line, col + i as i64, ch, style);
        }
    }

    fn hline(&mut self, line: i64, from: i64, to: i64, ch: char, style: Style) {
        for col in from..=to {
            self.put_char(line, col, ch, style);
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.height as usize);
        for row in 0..self.height {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            for col in 0..self.width {
                let (ch, style) = self.cells[(row * self.width + col) as usize];
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

/// Set up the terminal for TUI rendering with mouse capture.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard event loop until the operator quits.
pub fn run_dashboard(tree: OrgTree, config: &ConsoleConfig) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("The dashboard requires a terminal (TTY)."));
    }

    // Restore the terminal even if rendering panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut dashboard = Dashboard::new(tree, config);
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);

    loop {
        dashboard.pump_actions();

        terminal.draw(|frame| {
            dashboard.render(frame);
        })?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if dashboard.handle_key(key_event.code, key_event.modifiers) {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => dashboard.handle_mouse(mouse_event),
                _ => {}
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
