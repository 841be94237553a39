//! Cosmetic page behaviour: auth tabs, sticky header, animated counters,
//! cursor-follow parallax, password visibility and the small toggles around
//! them. Everything here is a pure function of its inputs; `app::dom` applies
//! the results to the document.

use std::time::Duration;

use crate::config::{
    LOGIN_PROMPT_DELAY, LOGIN_PROMPT_HOLD, MESSAGE_FADE_DELAY, MESSAGE_FADE_DURATION,
    TOAST_FADE_IN, TOAST_FADE_OUT, TOAST_HOLD,
};

/// Header gets `fixed-header` past this many pixels of scroll.
pub const HEADER_FIX_THRESHOLD: f64 = 60.0;
pub const FIXED_HEADER_CLASS: &str = "fixed-header";

/// Number of increments a counter animation takes to reach its target.
pub const COUNTER_STEPS: f64 = 100.0;
pub const DEFAULT_COUNTER_SUFFIX: &str = "K";

/// Maximum cursor-follow travel, in pixels, edge to edge.
pub const PARALLAX_RANGE: f64 = 50.0;
pub const PARALLAX_RESET: &str = "translate(0px, 0px)";

pub const LOGIN_PROMPT_TEXT: &str = "🔒 Please login or register to add to your wishlist.";

/// When a flash message is faded and when it is taken out of layout,
/// both measured from page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeSchedule {
    pub fade_at: Duration,
    pub hide_at: Duration,
}

pub fn message_fade() -> FadeSchedule {
    FadeSchedule {
        fade_at: MESSAGE_FADE_DELAY,
        hide_at: MESSAGE_FADE_DELAY + MESSAGE_FADE_DURATION,
    }
}

/// Login prompt: appears after a short delay, fades, then is removed.
pub fn login_prompt_fade() -> FadeSchedule {
    FadeSchedule {
        fade_at: LOGIN_PROMPT_DELAY + LOGIN_PROMPT_HOLD,
        hide_at: LOGIN_PROMPT_DELAY + LOGIN_PROMPT_HOLD + MESSAGE_FADE_DURATION,
    }
}

/// Toast: fades in, holds, then fades out and is detached.
pub fn toast_fade() -> FadeSchedule {
    FadeSchedule {
        fade_at: TOAST_FADE_IN + TOAST_HOLD,
        hide_at: TOAST_FADE_IN + TOAST_HOLD + TOAST_FADE_OUT,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

/// Which auth panel is shown and which tab button is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTabLayout {
    pub login_visible: bool,
    pub register_visible: bool,
    pub login_active: bool,
    pub register_active: bool,
}

impl AuthTab {
    pub fn layout(self) -> AuthTabLayout {
        let login = self == AuthTab::Login;
        AuthTabLayout {
            login_visible: login,
            register_visible: !login,
            login_active: login,
            register_active: !login,
        }
    }
}

pub fn header_is_fixed(scroll_y: f64) -> bool {
    scroll_y > HEADER_FIX_THRESHOLD
}

/// A counter starts once its top edge enters the viewport, and only once.
pub fn counter_should_start(rect_top: f64, viewport_height: f64, already_done: bool) -> bool {
    !already_done && rect_top < viewport_height
}

/// Count-up animation for a `.counter` element.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: f64,
    suffix: String,
    decimal: bool,
    count: f64,
    finished: bool,
}

impl CounterAnimation {
    /// `data-target` and `data-suffix` as found on the element. An unparsable
    /// target animates nothing and renders `0`.
    pub fn new(target: &str, suffix: Option<&str>) -> Self {
        let target = target.trim().parse::<f64>().unwrap_or(0.0);
        let target = if target.is_finite() { target } else { 0.0 };
        Self {
            target,
            suffix: suffix.unwrap_or(DEFAULT_COUNTER_SUFFIX).to_string(),
            decimal: target.fract() != 0.0,
            count: 0.0,
            finished: false,
        }
    }

    fn render(&self, value: f64) -> String {
        if self.decimal {
            format!("{value:.1}{}", self.suffix)
        } else {
            format!("{}{}", value.floor(), self.suffix)
        }
    }
}

impl Iterator for CounterAnimation {
    type Item = String;

    /// One label per animation frame; the last frame is exactly the target.
    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.count += self.target / COUNTER_STEPS;
        if self.count < self.target {
            Some(self.render(self.count))
        } else {
            self.finished = true;
            Some(self.render(self.target))
        }
    }
}

/// Cursor-follow offset for a pointer at (`x`, `y`) in a `width`×`height` viewport.
pub fn parallax_offset(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    (
        (x / width - 0.5) * PARALLAX_RANGE,
        (y / height - 0.5) * PARALLAX_RANGE,
    )
}

pub fn translate(offset: (f64, f64)) -> String {
    format!("translate({}px, {}px)", offset.0, offset.1)
}

/// Password input `type` and the matching eye icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVisibility {
    Hidden,
    Shown,
}

impl PasswordVisibility {
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type == "password" {
            PasswordVisibility::Hidden
        } else {
            PasswordVisibility::Shown
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PasswordVisibility::Hidden => PasswordVisibility::Shown,
            PasswordVisibility::Shown => PasswordVisibility::Hidden,
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            PasswordVisibility::Hidden => "password",
            PasswordVisibility::Shown => "text",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            PasswordVisibility::Hidden => "fa-eye",
            PasswordVisibility::Shown => "fa-eye-slash",
        }
    }

    pub fn stale_icon_class(self) -> &'static str {
        self.toggled().icon_class()
    }
}

/// Subcategory accordion: next `display` value for the content block.
pub fn toggle_display(current: &str) -> &'static str {
    if current == "block" {
        "none"
    } else {
        "block"
    }
}
