//! Browser-side behaviour of the site expressed as plain state machines: the
//! article table of contents, the once-per-session intro, and the now-playing
//! widget's polling loop. Hosts feed in measurements, scroll offsets and frame
//! timestamps; nothing here touches a DOM.

pub mod intro;
pub mod now_playing;
pub mod toc;
