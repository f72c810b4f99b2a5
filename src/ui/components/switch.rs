use gpui::prelude::*;
use gpui::{MouseButton, div, px, rgb};

/// Pill-shaped toggle with a sliding knob.
///
/// A disabled switch is drawn dimmed and ignores clicks.
pub fn switch(
    checked: bool,
    enabled: bool,
    on_click: impl Fn(&bool, &mut gpui::Window, &mut gpui::App) + 'static,
) -> impl IntoElement {
    let track = match (enabled, checked) {
        (false, _) => rgb(0x262626),
        (true, true) => rgb(0x4CAF50),
        (true, false) => rgb(0x333333),
    };

    let mut knob_track = div()
        .flex()
        .items_center()
        .w(px(44.0))
        .h(px(24.0))
        .rounded(px(12.0))
        .bg(track)
        .border_1()
        .border_color(if enabled { rgb(0x555555) } else { rgb(0x333333) });

    if enabled {
        knob_track = knob_track
            .cursor_pointer()
            .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                on_click(&checked, window, cx);
            });
    }

    knob_track.child(
        div()
            .w(px(16.0))
            .h(px(16.0))
            .rounded_full()
            .bg(if enabled { rgb(0xffffff) } else { rgb(0x666666) })
            .ml(if checked { px(20.0) } else { px(4.0) }),
    )
}
