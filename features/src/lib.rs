//! Process-global feature toggles.
//!
//! Operators flip these at startup; the hot paths only ever read an atomic.

use core::{
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
};

use log::info;
use parse_display::{Display, FromStr};
use variant_count::VariantCount;

static FEATURES: [AtomicBool; Feature::VARIANT_COUNT] =
    [const { AtomicBool::new(false) }; Feature::VARIANT_COUNT];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, FromStr, VariantCount)]
pub enum Feature {
    /// Stage slashings without publishing them on gossip. All other paths are unaffected.
    DisableBroadcastSlashings,
}

impl Feature {
    const ORDERING: Ordering = Ordering::SeqCst;

    #[inline]
    #[must_use]
    pub fn is_enabled(self) -> bool {
        FEATURES[self as usize].load(Self::ORDERING)
    }

    #[inline]
    pub fn enable(self) {
        FEATURES[self as usize].store(true, Self::ORDERING)
    }

    #[inline]
    pub fn disable(self) {
        FEATURES[self as usize].store(false, Self::ORDERING)
    }

    pub fn log(self, message: impl Display) {
        info!("[{self}] {message}");
    }
}
