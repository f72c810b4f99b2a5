use std::sync::Arc;

use gpui::prelude::*;
use gpui::{FontWeight, MouseButton, div, img, px, rgb};

use crate::monitor::Monitor;
use crate::ui::controller::Controller;

const THUMB_WIDTH: f32 = 120.0;
const THUMB_HEIGHT: f32 = 68.0;

/// Build the monitor list: one clickable row per monitor.
///
/// Each row shows the preview (or a placeholder swatch), the label,
/// resolution and position. Clicking a row places the main window there.
pub fn monitor_list(
    monitors: &[Monitor],
    thumbnails: &[Option<Arc<gpui::Image>>],
    current: Option<usize>,
    cx: &mut gpui::Context<Controller>,
) -> impl IntoElement + use<> {
    let mut list = div().flex().flex_col().gap_2().w_full().max_w(px(500.0));

    for (i, mon) in monitors.iter().enumerate() {
        let is_current = current == Some(i);

        let preview = match thumbnails.get(i).cloned().flatten() {
            Some(image) => img(image)
                .w(px(THUMB_WIDTH))
                .h(px(THUMB_HEIGHT))
                .rounded(px(4.0))
                .into_any_element(),
            None => div()
                .flex()
                .items_center()
                .justify_center()
                .w(px(THUMB_WIDTH))
                .h(px(THUMB_HEIGHT))
                .rounded(px(4.0))
                .bg(rgb(0x2a2a2a))
                .text_xs()
                .text_color(rgb(0x666666))
                .child("no preview")
                .into_any_element(),
        };

        let idx = i;
        let row = div()
            .flex()
            .items_center()
            .gap_3()
            .px_4()
            .py_3()
            .w_full()
            .rounded(px(8.0))
            .bg(if is_current {
                rgb(0x1e3a1e)
            } else {
                rgb(0x1e1e1e)
            })
            .border_1()
            .border_color(if is_current {
                rgb(0x4CAF50)
            } else {
                rgb(0x333333)
            })
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |this, _, _window, cx| {
                    this.select(idx);
                    cx.notify();
                }),
            )
            .child(preview)
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(2.0))
                    .flex_grow()
                    .child(
                        div()
                            .text_color(rgb(0xffffff))
                            .font_weight(FontWeight::MEDIUM)
                            .child(mon.display_label.clone()),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(rgb(0x666666))
                            .child(format!("pos: ({}, {})", mon.origin_x, mon.origin_y)),
                    ),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(rgb(0x4CAF50))
                    .child(if is_current { "● here" } else { "" }),
            );

        list = list.child(row);
    }

    list
}
