//! Interactive list browsing over stdin.
//!
//! The terminal plays the location bar: every committed change re-renders
//! the page. Typing goes through the debounced synchronizer, so a burst of
//! lines commits once.

use crate::render::render_list;
use countrydb_core::prelude::*;
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// New search box content.
    Text(String),
    Control(ListAction),
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Text(line.trim_end_matches(['\r', '\n']).to_string());
    };
    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };
    let control = match (name, arg) {
        ("q" | "quit", _) => return Input::Quit,
        ("n" | "next", _) => Some(ListAction::Next),
        ("p" | "prev", _) => Some(ListAction::Previous),
        ("d" | "distance", _) => Some(ListAction::ToggleDistance),
        ("page", n) => positive(n).map(ListAction::GoToPage),
        ("size", n) => positive(n).map(ListAction::SetPageSize),
        ("region", region) => Some(ListAction::SelectRegion(RegionFilter::parse(region))),
        _ => None,
    };
    match control {
        Some(action) => Input::Control(action),
        None => Input::Unknown(line.to_string()),
    }
}

fn positive(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Navigator that renders the list page on every replace.
pub struct TerminalNavigator {
    location: Mutex<String>,
    countries: Vec<Country>,
    pipeline: ListPipeline,
    near: Option<UserLocation>,
    config: Config,
}

impl TerminalNavigator {
    pub fn new(
        countries: Vec<Country>,
        location: impl Into<String>,
        pipeline: ListPipeline,
        near: Option<UserLocation>,
        config: Config,
    ) -> Self {
        Self {
            location: Mutex::new(location.into()),
            countries,
            pipeline,
            near,
            config,
        }
    }

    fn current(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn total_pages(&self) -> usize {
        let state = decode(&self.current(), &self.config);
        self.pipeline
            .run(&self.countries, &state, self.near)
            .total_pages
    }

    pub fn render(&self) -> String {
        let location = self.current();
        let state = decode(&location, &self.config);
        let view = self.pipeline.run(&self.countries, &state, self.near);
        render_list(&location, &state, &view, self.near)
    }
}

impl Navigator for TerminalNavigator {
    fn location(&self) -> String {
        self.current()
    }

    fn replace(&self, href: &str) {
        *self.location.lock().unwrap_or_else(|e| e.into_inner()) = href.to_string();
        println!("{}", self.render());
    }
}

pub async fn run(navigator: Arc<TerminalNavigator>, config: Config) -> anyhow::Result<()> {
    println!("{}", navigator.render());
    let sync = SearchSynchronizer::spawn(navigator.clone(), config.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Text(text) => sync.input(text),
            Input::Control(ListAction::ToggleDistance) if navigator.near.is_none() => {
                eprintln!("distance sorting needs --near LAT,LON");
            }
            Input::Control(action) => {
                debug!("control: {action:?}");
                action.dispatch(&*navigator, navigator.total_pages(), &config);
                sync.location_changed();
            }
            Input::Quit => break,
            Input::Unknown(line) => eprintln!("unknown command: {line}"),
        }
    }

    // Piped input ends right after the last line; let its edit settle.
    tokio::time::sleep(config.debounce * 2).await;
    sync.teardown();
    Ok(())
}
