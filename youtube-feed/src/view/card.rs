use crate::transform::Video;
use jiff::Timestamp;
use jiff::tz::TimeZone;
use std::time::{Duration, Instant};

/// What a card hands to the navigation layer when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    pub title: String,
}

/// A single grid card.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    video: &'a Video,
}

impl<'a> Card<'a> {
    pub fn new(video: &'a Video) -> Self {
        Self { video }
    }

    pub fn video(&self) -> &'a Video {
        self.video
    }

    pub fn on_press(&self) -> Selection {
        Selection {
            id: self.video.id.clone(),
            title: self.video.title.clone(),
        }
    }

    pub fn thumbnail_url(&self) -> Option<&'a str> {
        self.video.thumbnails.card_url()
    }

    /// Publication date as `M/D/YYYY`, in UTC.
    pub fn published_label(&self) -> String {
        let date = self.video.published_at.to_zoned(TimeZone::UTC);
        format!("{}/{}/{}", date.month(), date.day(), date.year())
    }

    /// How long ago the video was published, relative to `now`.
    ///
    /// Whole days are rounded up, so anything within the last 24 hours is "Today", then
    /// "N days ago" up to a week, "N weeks ago" up to 30 days, and "N months ago" (in 30-day
    /// months) after that.
    pub fn relative_published_label(&self, now: Timestamp) -> String {
        const DAY_MS: u128 = 24 * 60 * 60 * 1000;
        let elapsed = now.duration_since(self.video.published_at);
        let days = elapsed.as_millis().unsigned_abs().div_ceil(DAY_MS);
        match days {
            ..=1 => "Today".to_string(),
            2..=7 => format!("{days} days ago"),
            8..=30 => format!("{} weeks ago", days.div_ceil(7)),
            _ => format!("{} months ago", days.div_ceil(30)),
        }
    }

    /// Compact view count such as `1.2M views`. `None` for search results, which carry no
    /// statistics.
    pub fn view_count_label(&self) -> Option<String> {
        let count = self.video.view_count_u64()?;
        Some(match count {
            1_000_000.. => format!("{:.1}M views", count as f64 / 1_000_000.0),
            1_000.. => format!("{:.1}K views", count as f64 / 1_000.0),
            _ => format!("{count} views"),
        })
    }

    /// Upper-cased first character of the channel name, for the avatar bubble.
    pub fn avatar_initial(&self) -> Option<String> {
        self.video
            .channel_title
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hover {
    Idle,
    Pending { since: Instant },
    Shown,
}

/// Delayed hover preview.
///
/// The preview pops up once the pointer has rested on a card for [`Self::DELAY`]. Leaving
/// the card before then cancels it, and leaving after hides it. Time is passed in rather
/// than read so that callers drive it from their own clock.
#[derive(Debug, Clone, Copy)]
pub struct HoverPreview {
    hover: Hover,
}

impl Default for HoverPreview {
    fn default() -> Self {
        Self { hover: Hover::Idle }
    }
}

impl HoverPreview {
    pub const DELAY: Duration = Duration::from_millis(300);

    pub fn hover_in(&mut self, now: Instant) {
        if self.hover == Hover::Idle {
            self.hover = Hover::Pending { since: now };
        }
    }

    pub fn hover_out(&mut self) {
        self.hover = Hover::Idle;
    }

    /// Whether the popup is visible at `now`.
    pub fn is_visible(&mut self, now: Instant) -> bool {
        if let Hover::Pending { since } = self.hover {
            if now.saturating_duration_since(since) >= Self::DELAY {
                self.hover = Hover::Shown;
            }
        }
        self.hover == Hover::Shown
    }

    /// How long until the popup appears, if it is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.hover {
            Hover::Pending { since } => {
                Some(Self::DELAY.saturating_sub(now.saturating_duration_since(since)))
            }
            Hover::Idle | Hover::Shown => None,
        }
    }
}
