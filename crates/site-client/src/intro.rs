//! Once-per-session intro: the loading screen plays on the first visit only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const LOADING_DURATION: Duration = Duration::from_millis(1500);
/// Hero entrance waits for the loading screen to fade out.
pub const HERO_DELAY: Duration = Duration::from_millis(2100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPlan {
    Play { loading: Duration, hero_delay: Duration },
    Skip,
}

impl IntroPlan {
    pub fn hero_delay(&self) -> Duration {
        match self {
            IntroPlan::Play { hero_delay, .. } => *hero_delay,
            IntroPlan::Skip => Duration::ZERO,
        }
    }

    pub fn shows_loading(&self) -> bool {
        matches!(self, IntroPlan::Play { .. })
    }
}

/// Session-wide "intro already played" flag. Share one instance per session;
/// it is set on first entry and never reset.
#[derive(Debug, Default)]
pub struct IntroGate {
    played: AtomicBool,
}

impl IntroGate {
    pub const fn new() -> Self {
        Self {
            played: AtomicBool::new(false),
        }
    }

    pub fn enter(&self) -> IntroPlan {
        if self.played.swap(true, Ordering::AcqRel) {
            IntroPlan::Skip
        } else {
            IntroPlan::Play {
                loading: LOADING_DURATION,
                hero_delay: HERO_DELAY,
            }
        }
    }

    pub fn has_played(&self) -> bool {
        self.played.load(Ordering::Acquire)
    }
}
