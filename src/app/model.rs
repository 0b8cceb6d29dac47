use ratatui::widgets::TableState;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{FetchConfig, RepoRef};
use crate::data::{Issue, SPINNER_FRAMES};
use crate::services::fetch_issues;

use super::filter::{FilterMode, IssueItem, Page, VisibilityFilter};
use super::message::FetchResult;

pub struct App {
    // Data state
    pub page: Page,
    pub repository: RepoRef,

    // View state
    pub table_state: TableState,

    // Loading state
    pub loading: bool,

    // Popup state
    pub show_help_popup: bool,
    pub show_error_popup: bool,

    // Error state
    pub error: Option<String>,

    // Async communication
    pub fetch_tx: Sender<()>,
    pub result_rx: Receiver<FetchResult>,

    // Spinner state
    pub spinner_idx: usize,
    pub last_spinner_update: Instant,
}

impl App {
    pub fn new(config: FetchConfig) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel::<()>();
        let (result_tx, result_rx) = mpsc::channel::<FetchResult>();
        let repository = config.repository.clone();

        // Spawn background thread for fetching
        thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = result_tx.send(FetchResult::Error(format!(
                        "Failed to start runtime: {e}"
                    )));
                    return;
                }
            };
            while fetch_rx.recv().is_ok() {
                let msg = match rt.block_on(fetch_issues(&config)) {
                    Ok(issues) => FetchResult::Success(issues),
                    Err(e) => FetchResult::Error(e.to_string()),
                };
                if result_tx.send(msg).is_err() {
                    break;
                }
            }
        });

        Self::with_channels(repository, fetch_tx, result_rx)
    }

    /// An app with no items yet, talking to a fetcher over the given channels.
    pub fn with_channels(
        repository: RepoRef,
        fetch_tx: Sender<()>,
        result_rx: Receiver<FetchResult>,
    ) -> Self {
        Self {
            page: Page::new(Vec::new()),
            repository,
            table_state: TableState::default(),
            loading: false,
            show_help_popup: false,
            show_error_popup: false,
            error: None,
            fetch_tx,
            result_rx,
            spinner_idx: 0,
            last_spinner_update: Instant::now(),
        }
    }

    // Getters

    pub fn mode(&self) -> FilterMode {
        self.page.mode()
    }

    pub fn toggle_label(&self) -> &'static str {
        self.mode().control_label()
    }

    pub fn visible_items(&self) -> Vec<&IssueItem> {
        self.page.visible_items()
    }

    pub fn total_items(&self) -> usize {
        self.page.items().len()
    }

    pub fn selected_item(&self) -> Option<&IssueItem> {
        let visible = self.visible_items();
        self.table_state
            .selected()
            .and_then(|sel| visible.get(sel).copied())
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx]
    }

    // Spinner update

    pub fn update_spinner(&mut self) {
        if self.last_spinner_update.elapsed() >= Duration::from_millis(80) {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER_FRAMES.len();
            self.last_spinner_update = Instant::now();
        }
    }

    // Data

    /// Replace the list with freshly fetched issues, keeping the filter mode.
    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        let mode = self.mode();
        self.page = Page::new(issues);
        if let Some(mut filter) = VisibilityFilter::attach(&mut self.page) {
            filter.set_mode(mode);
        }
        self.reset_selection();
    }

    pub fn reset_selection(&mut self) {
        self.table_state = TableState::default();
        if !self.visible_items().is_empty() {
            self.table_state.select(Some(0));
        }
    }

    // Fetch management

    pub fn start_fetch(&mut self) {
        debug!(repository = %self.repository, "Starting fetch");
        self.loading = true;
        self.error = None;
        self.show_error_popup = false;
        if self.fetch_tx.send(()).is_err() {
            warn!("Fetch worker has exited");
            self.loading = false;
            self.error = Some("Fetch worker is not running".to_string());
            self.show_error_popup = true;
        }
    }

    pub fn check_fetch_result(&mut self) -> Option<FetchResult> {
        self.result_rx.try_recv().ok()
    }
}
