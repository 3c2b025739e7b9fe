use chrono::prelude::*;

use crate::{
    config::Config,
    display::pad2,
    time::{tick, RemainingDuration},
};

pub mod config;
pub mod display;
pub mod engine;
pub mod time;

pub use config::default_config_path;

/// A launch to count down to
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Countdown {
    target: DateTime<Local>,
    title: String,
    tagline: String,
}

impl Countdown {
    pub fn new(target: DateTime<Local>, title: &str) -> Self {
        Self {
            target,
            title: title.to_string(),
            tagline: String::new(),
        }
    }

    /// Build the countdown described by a config file
    pub fn from_config(config: &Config) -> Self {
        let mut countdown = Self::new(config.target, &config.title);
        countdown.set_tagline(&config.tagline);
        countdown
    }

    pub fn target(&self) -> DateTime<Local> {
        self.target
    }

    pub fn set_target(&mut self, target: DateTime<Local>) {
        self.target = target;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    pub fn set_tagline(&mut self, tagline: &str) {
        self.tagline = tagline.to_string();
    }

    pub fn remaining(&self, now: DateTime<Local>) -> RemainingDuration {
        tick(self.target, now)
    }

    /// Render a custom status line
    ///
    /// Recognized tokens are `%d` `%h` `%m` `%s` (padded units), `%D` (total
    /// seconds), `%t` / `%T` (target as RFC 3339 / Unix timestamp) and `%n`
    /// (title).
    pub fn format(&self, f: &str, now: DateTime<Local>) -> String {
        let remaining = self.remaining(now);

        // %n last so the title is never scanned for tokens
        f.replace("%d", &pad2(remaining.days()))
            .replace("%h", &pad2(remaining.hours().into()))
            .replace("%m", &pad2(remaining.minutes().into()))
            .replace("%s", &pad2(remaining.seconds().into()))
            .replace("%D", &remaining.total_seconds().to_string())
            .replace("%t", &self.target.to_rfc3339())
            .replace("%T", &self.target.timestamp().to_string())
            .replace("%n", &self.title)
    }
}
