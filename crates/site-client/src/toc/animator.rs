//! Marker animation between table-of-contents entries.
//!
//! The animator is driven by the host's frame callback. Each retarget hands out a
//! fresh [`AnimationHandle`]; ticks carrying an older handle are ignored, so a
//! superseded animation can never write a stale position.

use std::time::{Duration, Instant};

use super::layout::Point;

pub const ANIMATION_DURATION: Duration = Duration::from_millis(400);

/// `1 - (1 - t)^3`, clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Point,
    pub to: Point,
    pub from_progress: f64,
    pub to_progress: f64,
    pub target: usize,
    pub started_at: Instant,
}

impl Transition {
    fn sample(&self, now: Instant) -> (Point, f64, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = elapsed.as_secs_f64() / ANIMATION_DURATION.as_secs_f64();
        if t >= 1.0 {
            return (self.to, self.to_progress, true);
        }
        let eased = ease_out_cubic(t);
        let progress = self.from_progress + (self.to_progress - self.from_progress) * eased;
        (self.from.lerp(self.to, eased), progress, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerState {
    Idle { at: usize },
    Animating(Transition),
}

/// What the host should draw on this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Point,
    pub progress: f64,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct MarkerAnimator {
    state: MarkerState,
    position: Point,
    progress: f64,
    generation: u64,
}

impl MarkerAnimator {
    pub fn new(position: Point) -> Self {
        Self {
            state: MarkerState::Idle { at: 0 },
            position,
            progress: 0.0,
            generation: 0,
        }
    }

    pub fn state(&self) -> &MarkerState {
        &self.state
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Entry the marker rests on or is heading to.
    pub fn target(&self) -> usize {
        match self.state {
            MarkerState::Idle { at } => at,
            MarkerState::Animating(transition) => transition.target,
        }
    }

    /// Places the marker without animating and cancels any running transition.
    pub fn jump_to(&mut self, index: usize, position: Point, progress: f64) {
        self.generation += 1;
        self.state = MarkerState::Idle { at: index };
        self.position = position;
        self.progress = progress;
    }

    /// Starts animating towards entry `to` from wherever the marker is now.
    /// Returns `None` when `to` is already the target.
    pub fn retarget(&mut self, to: usize, position: Point, progress: f64, now: Instant) -> Option<AnimationHandle> {
        if to == self.target() {
            return None;
        }
        self.generation += 1;
        self.state = MarkerState::Animating(Transition {
            from: self.position,
            to: position,
            from_progress: self.progress,
            to_progress: progress,
            target: to,
            started_at: now,
        });
        Some(AnimationHandle(self.generation))
    }

    /// Advances the running animation. Returns `None` for stale handles or when idle.
    pub fn tick(&mut self, handle: AnimationHandle, now: Instant) -> Option<Frame> {
        if handle.0 != self.generation {
            return None;
        }
        let MarkerState::Animating(transition) = self.state else {
            return None;
        };
        let (position, progress, finished) = transition.sample(now);
        self.position = position;
        self.progress = progress;
        if finished {
            self.state = MarkerState::Idle { at: transition.target };
        }
        Some(Frame {
            position,
            progress,
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Point = Point::new(5.0, 10.0);
    const B: Point = Point::new(18.0, 42.0);
    const C: Point = Point::new(5.0, 74.0);

    #[test]
    fn easing_curve() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(3.0), 1.0);
    }

    #[test]
    fn animation_lands_exactly_on_target() {
        let start = Instant::now();
        let mut animator = MarkerAnimator::new(A);
        let handle = animator.retarget(1, B, 0.5, start).unwrap();

        let halfway = animator.tick(handle, start + ANIMATION_DURATION / 2).unwrap();
        assert!(!halfway.finished);
        assert_eq!(halfway.position, A.lerp(B, 0.875));
        assert_eq!(halfway.progress, 0.4375);

        let done = animator.tick(handle, start + ANIMATION_DURATION).unwrap();
        assert!(done.finished);
        assert_eq!(done.position, B);
        assert_eq!(done.progress, 0.5);
        assert_eq!(animator.state(), &MarkerState::Idle { at: 1 });
        assert!(animator.tick(handle, start + ANIMATION_DURATION * 2).is_none());
    }

    #[test]
    fn retarget_starts_from_current_position_and_cancels_old_handle() {
        let start = Instant::now();
        let mut animator = MarkerAnimator::new(A);
        let first = animator.retarget(1, B, 0.5, start).unwrap();
        animator.tick(first, start + Duration::from_millis(100)).unwrap();
        let midway = animator.position();

        let second = animator.retarget(2, C, 1.0, start + Duration::from_millis(100)).unwrap();
        assert_ne!(first, second);
        assert!(animator.tick(first, start + Duration::from_millis(150)).is_none());

        match animator.state() {
            MarkerState::Animating(transition) => {
                assert_eq!(transition.from, midway);
                assert_eq!(transition.target, 2);
            }
            other => panic!("expected animation, got {other:?}"),
        }
        let done = animator.tick(second, start + Duration::from_millis(600)).unwrap();
        assert_eq!(done.position, C);
        assert_eq!(animator.target(), 2);
    }

    #[test]
    fn retarget_to_current_target_is_noop() {
        let start = Instant::now();
        let mut animator = MarkerAnimator::new(A);
        assert!(animator.retarget(0, A, 0.0, start).is_none());
        let handle = animator.retarget(1, B, 0.5, start).unwrap();
        assert!(animator.retarget(1, B, 0.5, start).is_none());
        assert!(animator.tick(handle, start).is_some());
    }

    #[test]
    fn jump_cancels_running_animation() {
        let start = Instant::now();
        let mut animator = MarkerAnimator::new(A);
        let handle = animator.retarget(2, C, 1.0, start).unwrap();
        animator.jump_to(1, B, 0.5);
        assert!(animator.tick(handle, start + ANIMATION_DURATION).is_none());
        assert_eq!(animator.position(), B);
        assert_eq!(animator.target(), 1);
    }
}
