use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};

use cookbot_core::{
    spawn_exchange, Config, Conversation, ExchangeEvent, HealthMonitor, HealthStatus,
    IntentRouter, ServiceClient,
};

pub struct App {
    // Core state
    pub should_quit: bool,
    pub conversation: Conversation,

    // Input state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat view state
    pub chat_scroll: u16,
    pub follow_bottom: bool, // keep newest turn in view until the user scrolls up
    pub chat_height: u16,    // Height of chat area for scroll calculations
    pub chat_width: u16,     // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub health_checking: bool,

    router: IntentRouter,
    monitor: HealthMonitor,
    exchange_rx: Option<mpsc::UnboundedReceiver<ExchangeEvent>>,
    health_rx: Option<mpsc::UnboundedReceiver<HealthStatus>>,
    periodic_health_rx: Option<mpsc::UnboundedReceiver<HealthStatus>>,
}

impl App {
    /// Build the app and kick off the startup health check. Needs a tokio runtime.
    pub fn new(config: &Config) -> Self {
        let backend = Arc::new(ServiceClient::from_config(config));
        let router = IntentRouter::new(backend.clone());
        let monitor = HealthMonitor::new(backend);

        let mut app = Self {
            should_quit: false,
            conversation: Conversation::new(),
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            follow_bottom: true,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            health_checking: false,
            router,
            monitor,
            exchange_rx: None,
            health_rx: None,
            periodic_health_rx: None,
        };

        match config.health_poll_interval() {
            // Periodic polling also covers the startup check
            Some(interval) => {
                app.health_checking = true;
                app.periodic_health_rx = Some(app.monitor.spawn_periodic(interval));
            }
            None => app.refresh_health(),
        }

        app
    }

    /// Send the input box contents. The text stays in the box if the
    /// conversation refuses it (blank, or an answer is still pending).
    pub fn submit_input(&mut self) {
        if !self.conversation.submit(&self.input) {
            return;
        }

        let message = self.input.trim().to_string();
        tracing::debug!("Submitting message ({} chars)", message.chars().count());
        self.exchange_rx = Some(spawn_exchange(self.router.clone(), message));

        self.input.clear();
        self.cursor = 0;
        self.scroll_to_bottom();
    }

    /// Start a health check. A check still in flight is superseded.
    pub fn refresh_health(&mut self) {
        self.health_checking = true;
        self.health_rx = Some(self.monitor.spawn_poll());
    }

    /// Start a new chat. Any pending answer is discarded.
    pub fn new_chat(&mut self) {
        self.exchange_rx = None;
        self.conversation.reset();
        self.chat_scroll = 0;
        self.follow_bottom = true;
    }

    /// Apply whatever the background tasks have produced so far.
    pub fn poll_background(&mut self) {
        if let Some(rx) = self.exchange_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(event) => {
                        self.conversation.apply(event);
                        self.follow_bottom = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.exchange_rx = None;
                        break;
                    }
                }
            }
        }

        if let Some(rx) = self.health_rx.as_mut() {
            match rx.try_recv() {
                Ok(status) => {
                    self.conversation.set_health(status);
                    self.health_rx = None;
                    self.health_checking = false;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.health_rx = None;
                    self.health_checking = false;
                }
            }
        }

        if let Some(rx) = self.periodic_health_rx.as_mut() {
            while let Ok(status) = rx.try_recv() {
                self.conversation.set_health(status);
                self.health_checking = false;
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_busy() || self.health_checking {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max_scroll = self.max_chat_scroll();
        self.chat_scroll = (self.chat_scroll + lines).min(max_scroll);
        if self.chat_scroll >= max_scroll {
            self.follow_bottom = true;
        }
    }

    pub fn max_chat_scroll(&self) -> u16 {
        self.chat_line_count().saturating_sub(self.chat_height)
    }

    /// Number of wrapped lines the transcript takes at the current chat width.
    pub fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for turn in self.conversation.turns() {
            total_lines += 1; // Speaker line ("You:" or "Chef:")
            for line in turn.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                total_lines += char_count.max(1).div_ceil(wrap_width);
            }
            total_lines += 1; // blank separator
        }

        if self.conversation.is_busy() && self.conversation.placeholder().is_none() {
            total_lines += 2; // "Chef:" + "Thinking..."
        }

        total_lines.min(u16::MAX as usize) as u16
    }
}
