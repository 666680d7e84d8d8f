use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use wordscope_core::{update, AppState, AppViewModel, Msg, StatusView};
use wordscope_engine::{render_chart_html, Pipeline, ReqwestFetcher, SessionDir};
use wordscope_logging::{ws_error, ws_info};

use super::config;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command, HELP};
use super::ui::render;

const CHART_FILENAME: &str = "chart.html";
/// How long the loop waits for input before checking the engine again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("reading working directory")?;
    let config = config::load(&cwd)?;
    wordscope_logging::initialize(config.log_destination(), config.log_level()?, &config.log_file);
    ws_info!("Starting wordscope with {:?}", config);

    let pipeline = Pipeline::with_parts(
        Arc::new(ReqwestFetcher::new(config.fetch_settings())),
        config.tokenizer(),
        config.analysis_settings(),
    )
    .with_cache_capacity(config.cache_capacity);
    let session = SessionDir::new().context("creating session directory")?;
    let runner = EffectRunner::new(pipeline);

    let (state, _) = update(
        AppState::with_settings(config.analysis_settings()),
        Msg::ChartSelected(config.default_chart()?),
    );
    let mut app = App {
        state,
        runner,
        session,
    };

    let input_rx = spawn_input_reader();
    println!("{HELP}");
    app.show(&app.state.view());

    let mut input_closed = false;
    loop {
        match next_command(&input_rx, &mut input_closed) {
            Some(Command::Msg(msg)) => app.dispatch(msg),
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::ListCharts) => println!("{}", render::chart_list(app.state.chart())),
            Some(Command::Invalid(reason)) => println!("{reason}"),
            Some(Command::Quit) => break,
            None => {}
        }

        for msg in app.runner.poll() {
            app.dispatch(msg);
        }

        // With piped input, let the last submission finish before leaving.
        if input_closed && !app.is_loading() {
            break;
        }
    }

    ws_info!("Session finished");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    session: SessionDir,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        self.runner.run(effects);
        if was_dirty {
            self.show(&view);
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self.state.view().status, StatusView::Loading { .. })
    }

    fn show(&self, view: &AppViewModel) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        print!("{}", render::render(view, &timestamp));
        if let Some(analysis) = &view.analysis {
            let title = match &view.status {
                StatusView::Ready {
                    title: Some(title), ..
                } => format!("{title} ({})", view.chart),
                _ => view.chart.to_string(),
            };
            let html = render_chart_html(&analysis.payload, &title);
            match self.session.write(CHART_FILENAME, &html) {
                Ok(path) => println!("Chart page: {}", path.display()),
                Err(err) => {
                    ws_error!("Failed to write chart page: {}", err);
                    println!("Could not write the chart page: {err}");
                }
            }
        }
        let _ = io::stdout().flush();
    }
}

/// Waits up to one poll interval for input. Once input has closed, the wait is
/// a plain sleep so the loop keeps its pace while the last load finishes.
fn next_command(input_rx: &Receiver<Command>, input_closed: &mut bool) -> Option<Command> {
    if *input_closed {
        thread::sleep(POLL_INTERVAL);
        return None;
    }
    match input_rx.recv_timeout(POLL_INTERVAL) {
        Ok(command) => Some(command),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => {
            *input_closed = true;
            None
        }
    }
}

fn spawn_input_reader() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = commands::parse_line(&line) {
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
        }
    });
    rx
}
