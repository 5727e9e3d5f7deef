use color_eyre::Result;
use color_eyre::eyre::{self, Context};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    symbols::border,
    widgets::{
        Block, Borders, Paragraph,
        block::{Position, Title},
    },
};
use std::{
    io::{self, Stdout, stdout},
    panic,
    rc::Rc,
    time::Instant,
};
use tracing::info;

use crate::display::PanelDisplay;
use crate::plain::LoopOptions;
use crate::sim::{ScenarioFeed, SimRobot};

use self::widgets::{OledWidget, RulesWidget, WheelsWidget};

mod widgets;

pub fn run(robot: SimRobot<PanelDisplay>, feed: Rc<ScenarioFeed>, options: LoopOptions) -> Result<()> {
    let mut terminal = init()?;
    let mut app = App::new(robot, feed, options);
    let outcome = app.run(&mut terminal);
    restore()?;
    outcome?;
    println!("Stopped");
    Ok(())
}

pub struct App {
    robot: SimRobot<PanelDisplay>,
    feed: Rc<ScenarioFeed>,
    options: LoopOptions,
    exit: bool,
}

impl App {
    pub fn new(robot: SimRobot<PanelDisplay>, feed: Rc<ScenarioFeed>, options: LoopOptions) -> Self {
        Self {
            robot,
            feed,
            options,
            exit: false,
        }
    }

    /// runs the control loop until the user quits or the cycle limit is hit,
    /// then shuts the robot down even if a cycle failed
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let outcome = self.drive(terminal);
        let stopped = self.robot.shutdown().wrap_err("shutdown failed");
        outcome.and(stopped)?;
        terminal.draw(|frame| self.render_frame(frame))?;
        Ok(())
    }

    fn drive<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(interval_ms = self.options.interval.as_millis() as u64, "control loop started");
        while !self.exit && !self.options.limit_reached(self.robot.cycles()) {
            let deadline = Instant::now() + self.options.interval;
            self.robot.cycle().wrap_err("control cycle failed")?;
            self.feed.advance();
            terminal.draw(|frame| self.render_frame(frame))?;

            if self.options.limit_reached(self.robot.cycles()) {
                break;
            }
            while !self.exit {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() || !event::poll(remaining)? {
                    break;
                }
                self.handle_events().wrap_err("handle events failed")?;
            }
        }

        if !self.exit {
            info!("cycle limit reached");
        }
        Ok(())
    }

    fn render_frame(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.size())
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read()? {
            // it's important to check that the event is a key press event as
            // crossterm also emits key release and repeat events on Windows.
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => self
                .handle_key_event(key_event)
                .wrap_err_with(|| format!("handling key event failed:\n{key_event:#?}")),
            _ => Ok(()),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit(),
            // raw mode swallows SIGINT, so Ctrl-C arrives as a key
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                info!("interrupted");
                self.exit()
            }
            _ => {}
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Title::from(" Line Robot ".bold());
        let instructions = Title::from(Line::from(vec![
            format!(" cycle {} ", self.robot.cycles()).into(),
            format!(" frame {}/{} ", self.feed.position() + 1, self.feed.frame_count()).into(),
            if self.feed.is_exhausted() { "(held) ".yellow() } else { "".into() },
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]));
        let block = Block::default()
            .title(title.alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(Position::Bottom),
            )
            .borders(Borders::ALL)
            .border_set(border::THICK);
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(inner);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(4)])
            .split(columns[2]);

        let Some(report) = self.robot.display().latest() else {
            // displays are blank after shutdown
            Paragraph::new("Stopped".yellow())
                .centered()
                .render(inner, buf);
            return;
        };

        OledWidget::new(" ToF ", report.distance_panel()).render(columns[0], buf);
        OledWidget::new(" IR ", report.line_panel()).render(columns[1], buf);
        RulesWidget::new(report).render(right[0], buf);
        WheelsWidget::new(self.robot.engine().actuator().wheels()).render(right[1], buf);
    }
}

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Alternate screen and raw mode, with hooks that undo both on error.
pub fn init() -> Result<Tui> {
    install_hooks()?;
    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

pub fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// color-eyre reports land on the normal screen, so the terminal is restored first.
fn install_hooks() -> Result<()> {
    let (panic_report, error_report) = color_eyre::config::HookBuilder::default().into_hooks();

    let panic_report = panic_report.into_panic_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        panic_report(info);
    }));

    let error_report = error_report.into_eyre_hook();
    eyre::set_hook(Box::new(move |error| {
        let _ = restore();
        error_report(error)
    }))?;
    Ok(())
}
