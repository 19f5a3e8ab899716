//! Home page composition.
//!
//! The home page is a single column of sections: product carousels with
//! slim promotional banners slotted between them. [`interleave`] decides the
//! order; [`HomeFeed`] fetches the inputs and falls back to a plain product
//! grid when there is nothing to show.

mod feed;
mod interleave;

pub use feed::{FALLBACK_PRODUCT_LIMIT, HomeFeed};
pub use interleave::{interleave, interleave_with_ratio};

use serde::Serialize;

use vitrina_core::{BannerId, CarouselId};

use crate::api::{Carousel, SlimBanner};

/// Discriminator of a [`HomeSection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeSectionKind {
    Carousel,
    SlimBanner,
}

impl HomeSectionKind {
    /// Wire tag of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carousel => "carousel",
            Self::SlimBanner => "slim_banner",
        }
    }
}

impl std::fmt::Display for HomeSectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the home page, in render order.
///
/// `sort_order` is the section's zero-based position in the sequence it was
/// produced in, not the `sortOrder` of the source entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum HomeSection {
    Carousel {
        id: CarouselId,
        sort_order: usize,
        data: Carousel,
    },
    SlimBanner {
        id: BannerId,
        sort_order: usize,
        data: SlimBanner,
    },
}

impl HomeSection {
    /// Id of the source carousel or banner.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Carousel { id, .. } => id.as_str(),
            Self::SlimBanner { id, .. } => id.as_str(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> HomeSectionKind {
        match self {
            Self::Carousel { .. } => HomeSectionKind::Carousel,
            Self::SlimBanner { .. } => HomeSectionKind::SlimBanner,
        }
    }

    /// Position in the rendered sequence.
    #[must_use]
    pub const fn sort_order(&self) -> usize {
        match self {
            Self::Carousel { sort_order, .. } | Self::SlimBanner { sort_order, .. } => *sort_order,
        }
    }

    #[must_use]
    pub const fn as_carousel(&self) -> Option<&Carousel> {
        match self {
            Self::Carousel { data, .. } => Some(data),
            Self::SlimBanner { .. } => None,
        }
    }

    #[must_use]
    pub const fn as_slim_banner(&self) -> Option<&SlimBanner> {
        match self {
            Self::SlimBanner { data, .. } => Some(data),
            Self::Carousel { .. } => None,
        }
    }
}
