use regex::Regex;
use std::sync::LazyLock;

/// Widest viewport still treated as a phone even without a mobile user agent
pub const MOBILE_MAX_WIDTH: u32 = 768;

static MOBILE_USER_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("user agent pattern is static")
});

pub fn is_mobile_device(user_agent: &str, viewport_width: u32) -> bool {
    MOBILE_USER_AGENT.is_match(user_agent) || viewport_width <= MOBILE_MAX_WIDTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn from_viewport(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// What the overlay knows about the screen it is drawn on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub user_agent: String,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_mobile(&self) -> bool {
        is_mobile_device(&self.user_agent, self.width)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_viewport(self.width, self.height)
    }
}
