use std::sync::Arc;

use gpui::prelude::*;
use gpui::{FontWeight, MouseButton, div, px, rgb};
use tracing::{debug, info, warn};

use crate::monitor::preview::decode_data_uri;
use crate::monitor::{Monitor, PreviewOptions, Win32Displays, list_monitors};
use crate::overlay::{PlacementController, Win32Window};
use crate::ui::components::switch;
use crate::ui::monitor_list::monitor_list;

/// Monitor picker: lists monitors and moves the main window on click.
///
/// Owns the [`PlacementController`], so every placement and click-through
/// change goes through this view on the UI thread.
pub struct Controller {
    /// Monitors from the most recent enumeration, sorted by `origin_x`.
    pub monitors: Vec<Monitor>,
    /// Decoded preview per monitor; `None` renders a placeholder swatch.
    pub thumbnails: Vec<Option<Arc<gpui::Image>>>,
    /// Index of the monitor currently hosting the main window.
    pub current: Option<usize>,
    /// Last placement or enumeration failure, shown under the list.
    pub last_error: Option<String>,
    refreshing: bool,
    placement: PlacementController<Win32Window>,
    preview_options: PreviewOptions,
}

impl Controller {
    pub fn new(
        monitors: Vec<Monitor>,
        placement: PlacementController<Win32Window>,
        preview_options: PreviewOptions,
        current: Option<usize>,
    ) -> Self {
        let thumbnails = thumbnails_for(&monitors);
        Self {
            monitors,
            thumbnails,
            current,
            last_error: None,
            refreshing: false,
            placement,
            preview_options,
        }
    }

    /// Place the main window on `index`. Invalid indices are reported, not fatal.
    pub fn select(&mut self, index: usize) {
        match self.placement.place_on_monitor(index, &self.monitors) {
            Ok(()) => {
                self.current = Some(index);
                self.last_error = None;
            }
            Err(e) => {
                if e.is_user_error() {
                    info!(
                        event = "ui.picker.placement_rejected",
                        code = e.error_code(),
                        error = %e
                    );
                } else {
                    warn!(event = "ui.picker.placement_failed", code = e.error_code(), error = %e);
                }
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub fn toggle_click_through(&mut self) {
        let result = if self.placement.is_click_through() {
            self.placement.focus()
        } else {
            self.placement.blur()
        };
        if let Err(e) = result {
            warn!(event = "ui.picker.visibility_failed", code = e.error_code(), error = %e);
            self.last_error = Some(e.to_string());
        }
    }

    /// Re-enumerate on the background executor and redraw when it lands.
    pub fn refresh(&mut self, cx: &mut gpui::Context<Self>) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        info!(event = "ui.picker.refresh_started");

        let options = self.preview_options;
        cx.spawn(async move |this, cx| {
            let result = cx
                .background_executor()
                .spawn(async move {
                    list_monitors(&Win32Displays::new(), &options).map_err(|e| e.to_string())
                })
                .await;
            let updated = this.update(cx, |this, cx| {
                this.apply_refresh(result);
                cx.notify();
            });
            if updated.is_err() {
                debug!(event = "ui.picker.refresh_dropped", reason = "view_released");
            }
        })
        .detach();
    }

    fn apply_refresh(&mut self, result: Result<Vec<Monitor>, String>) {
        self.refreshing = false;
        match result {
            Ok(monitors) => {
                info!(event = "ui.picker.refresh_completed", count = monitors.len());
                if self.current.is_some_and(|i| i >= monitors.len()) {
                    self.current = None;
                }
                self.thumbnails = thumbnails_for(&monitors);
                self.monitors = monitors;
                self.last_error = None;
            }
            Err(message) => {
                warn!(event = "ui.picker.refresh_failed", error = %message);
                self.last_error = Some(message);
            }
        }
    }
}

fn thumbnails_for(monitors: &[Monitor]) -> Vec<Option<Arc<gpui::Image>>> {
    monitors
        .iter()
        .map(|m| {
            decode_data_uri(&m.preview)
                .map(|bytes| Arc::new(gpui::Image::from_bytes(gpui::ImageFormat::Jpeg, bytes)))
        })
        .collect()
}

impl Render for Controller {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        cx: &mut gpui::Context<Self>,
    ) -> impl IntoElement {
        let overlay_mode = self.placement.mode().is_overlay();
        let click_through = self.placement.is_click_through();

        let mon_list = monitor_list(&self.monitors, &self.thumbnails, self.current, cx);

        // ── Click-through panel ──────────────────────────────────────────
        let visibility_panel = div()
            .flex()
            .items_center()
            .justify_between()
            .w_full()
            .max_w(px(500.0))
            .px_4()
            .py_4()
            .rounded(px(12.0))
            .bg(rgb(0x1e1e1e))
            .border_1()
            .border_color(rgb(0x333333))
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(2.0))
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::BOLD)
                            .text_color(rgb(0xffffff))
                            .child("Click-through"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(rgb(0x888888))
                            .child(if !overlay_mode {
                                "Unavailable in window mode"
                            } else if click_through {
                                "Clicks pass through the overlay"
                            } else {
                                "Overlay captures the mouse"
                            }),
                    ),
            )
            .child(switch(
                click_through,
                overlay_mode,
                cx.listener(move |this, _, _window, cx| {
                    if this.placement.mode().is_overlay() {
                        this.toggle_click_through();
                        cx.notify();
                    }
                }),
            ));

        let refresh_button = div()
            .px_3()
            .py_1()
            .rounded(px(6.0))
            .bg(rgb(0x2a2a2a))
            .border_1()
            .border_color(rgb(0x555555))
            .text_sm()
            .text_color(rgb(0xcccccc))
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, _, _window, cx| {
                    this.refresh(cx);
                    cx.notify();
                }),
            )
            .child(if self.refreshing { "Refreshing…" } else { "Refresh" });

        let sep = || div().w_full().max_w(px(500.0)).h(px(1.0)).bg(rgb(0x333333));

        div()
            .flex()
            .flex_col()
            .gap_5()
            .size_full()
            .p_6()
            .items_center()
            .bg(rgb(0x0e0e0e))
            .child(
                div()
                    .text_2xl()
                    .font_weight(FontWeight::BOLD)
                    .text_color(rgb(0xffffff))
                    .child("Glass Overlay"),
            )
            .child(sep())
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .w_full()
                    .max_w(px(500.0))
                    .child(
                        div()
                            .text_lg()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(rgb(0xcccccc))
                            .child(format!("Monitors ({})", self.monitors.len())),
                    )
                    .child(refresh_button),
            )
            .child(mon_list)
            .child(
                div()
                    .w_full()
                    .max_w(px(500.0))
                    .text_sm()
                    .text_color(rgb(0xE57373))
                    .child(self.last_error.clone().unwrap_or_default()),
            )
            .child(sep())
            .child(visibility_panel)
    }
}
