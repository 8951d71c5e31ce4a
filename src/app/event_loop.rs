use std::io::stdout;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::effects::Dispatcher;
use crate::app::model::Request;
use crate::app::{App, Message, Model, update};
use crate::gateway::{Gateway, HttpGateway};
use crate::validation::Rules;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime, the HTTP client or the terminal
    /// cannot be initialized, or if drawing or reading input fails.
    pub fn run(&mut self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("folio-gateway")
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;
        let gateway = HttpGateway::new(self.api_url.clone(), self.timeout)
            .context("Failed to create the HTTP client")?;
        info!(api_url = %gateway.base_url(), "starting folio");

        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher::new(runtime.handle().clone(), gateway, tx);

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; folio requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(
            self.api_url.clone(),
            Rules::default(),
            (size.width, size.height),
        );
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.request(Request::Load);

        let result = execute!(stdout(), EnableMouseCapture)
            .map_err(anyhow::Error::from)
            .and_then(|()| Self::event_loop(&mut terminal, &mut model, &dispatcher, &rx));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        runtime.shutdown_timeout(Duration::from_millis(500));
        info!("folio stopped");

        result
    }

    fn apply(model: &mut Model, msg: Message) {
        debug!(?msg, "message");
        *model = update(std::mem::take(model), msg);
    }

    fn event_loop<G: Gateway + 'static>(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        dispatcher: &Dispatcher<G>,
        results: &Receiver<Message>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        loop {
            let was_syncing = model.is_syncing();
            dispatcher.dispatch(model);

            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                Self::apply(model, Message::Resize(width, height));
                needs_render = true;
            }

            // Gateway results, in arrival order
            while let Ok(msg) = results.try_recv() {
                Self::apply(model, msg);
                needs_render = true;
            }
            if was_syncing != model.is_syncing() {
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if resize_debouncer.is_pending() {
                10
            } else if model.is_syncing() {
                50
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    Self::apply(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        Self::apply(model, msg);
                        needs_render = true;
                    }
                }
            }
        }
        Ok(())
    }
}
