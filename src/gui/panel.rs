//! GUI panel controller: owns the wry webview and its layout state.
//!
//! `ViewerApp` holds a single `PanelController` field instead of a handful
//! of `#[cfg(feature = "gui")]` fields.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use winit::window::Window;

use super::webview::{self, UiAction};
use crate::GalaxyEngine;

/// Owns the webview panel and all associated state.
pub(crate) struct PanelController {
    webview: Option<wry::WebView>,
    action_rx: Option<mpsc::Receiver<UiAction>>,
    last_stats_push: Instant,
    /// Whether the options panel is pinned open (visible).
    pinned: bool,
    /// Whether the panel is temporarily revealed by a mouse hover.
    peek: bool,
    /// Current panel width in physical pixels.
    width: u32,
    /// Where `save_options` writes the preset.
    save_path: PathBuf,
}

// ── Constants ────────────────────────────────────────────────────────────

impl PanelController {
    /// Margin around the panel when floating (not pinned).
    const PANEL_MARGIN: u32 = 10;
    /// Minimum panel width for resize.
    const MIN_PANEL_WIDTH: u32 = 220;
    /// Maximum panel width for resize.
    const MAX_PANEL_WIDTH: u32 = 700;
    /// Stats push interval (~4 Hz).
    const STATS_INTERVAL: Duration = Duration::from_millis(250);
}

// ── Construction ─────────────────────────────────────────────────────────

impl PanelController {
    /// Create a new controller (pinned, no webview yet).
    pub(crate) fn new(save_path: PathBuf) -> Self {
        Self {
            webview: None,
            action_rx: None,
            last_stats_push: Instant::now(),
            pinned: true,
            peek: false,
            width: webview::PANEL_WIDTH,
            save_path,
        }
    }

    /// Create the wry webview and push the initial schema to it. On
    /// failure the viewer keeps running without a panel.
    pub(crate) fn init_webview(&mut self, window: &Window, engine: &GalaxyEngine) {
        let inner = window.inner_size();
        match webview::create_webview(window, inner.width, inner.height, self.width)
        {
            Ok((wv, rx)) => {
                webview::push_schema(&wv, engine.options());
                webview::push_panel_pinned(&wv, self.pinned);
                self.webview = Some(wv);
                self.action_rx = Some(rx);
            }
            Err(e) => log::error!("Failed to create webview: {e}"),
        }
    }
}

// ── Runtime ──────────────────────────────────────────────────────────────

impl PanelController {
    /// Toggle pinned state, push it to the webview, and re-layout.
    pub(crate) fn toggle(&mut self, window: &Window) {
        self.pinned = !self.pinned;
        self.peek = false;
        if let Some(ref wv) = self.webview {
            webview::push_panel_pinned(wv, self.pinned);
        }
        self.apply_layout(window);
    }

    /// Position the webview according to the current pinned/peek state.
    /// The engine surface always covers the full window; the panel
    /// overlays its right edge.
    pub(crate) fn apply_layout(&self, window: &Window) {
        let Some(ref wv) = self.webview else {
            return;
        };
        let inner = window.inner_size();

        let bounds = if self.pinned {
            webview::panel_bounds(inner.width, inner.height, self.width)
        } else if self.peek {
            webview::panel_bounds_floating(
                inner.width,
                inner.height,
                self.width,
                Self::PANEL_MARGIN,
            )
        } else {
            webview::hidden_bounds(inner.width, inner.height, self.width)
        };
        let _ = wv.set_bounds(bounds);
    }

    /// Reveal the unpinned panel while the mouse is near the right edge.
    pub(crate) fn update_peek(&mut self, mouse_x: f32, window: &Window) {
        if self.pinned {
            return;
        }
        let window_width = window.inner_size().width as f32;
        let edge_zone = 6.0;

        let near_edge = mouse_x >= window_width - edge_zone;
        let in_panel = mouse_x
            >= window_width - self.width as f32 - Self::PANEL_MARGIN as f32;
        let should_peek = near_edge || (self.peek && in_panel);

        if should_peek != self.peek {
            self.peek = should_peek;
            self.apply_layout(window);
        }
    }

    /// Drain IPC actions from the webview and apply them to the engine.
    pub(crate) fn drain_and_apply(
        &mut self,
        engine: &mut GalaxyEngine,
        window: &Window,
    ) {
        let actions: Vec<UiAction> = match self.action_rx {
            Some(ref rx) => rx.try_iter().collect(),
            None => return,
        };

        for action in actions {
            match action {
                UiAction::SetOption { path, field, value } => {
                    if !engine.set_option(&path, &field, value) {
                        // Snap the panel back to the values actually in use.
                        if let Some(ref wv) = self.webview {
                            webview::push_options(wv, engine.options());
                        }
                    }
                }
                UiAction::TogglePanel => self.toggle(window),
                UiAction::ResizePanel { width } => {
                    let clamped =
                        width.clamp(Self::MIN_PANEL_WIDTH, Self::MAX_PANEL_WIDTH);
                    if clamped != self.width {
                        self.width = clamped;
                        self.apply_layout(window);
                    }
                }
                UiAction::SaveOptions => {
                    match engine.options().save(&self.save_path) {
                        Ok(()) => log::info!(
                            "saved options to {}",
                            self.save_path.display()
                        ),
                        Err(e) => log::error!("failed to save options: {e}"),
                    }
                }
            }
        }
    }

    /// Push FPS and scene stats to the webview at ~4 Hz.
    pub(crate) fn push_stats_if_due(&mut self, now: Instant, engine: &GalaxyEngine) {
        let Some(ref wv) = self.webview else {
            return;
        };
        if now.duration_since(self.last_stats_push) < Self::STATS_INTERVAL {
            return;
        }
        webview::push_stats(wv, &engine.stats());
        self.last_stats_push = now;
    }
}
