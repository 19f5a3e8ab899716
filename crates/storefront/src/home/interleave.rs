use crate::api::{Carousel, SlimBanner};

use super::HomeSection;

/// Merge carousels and slim banners into one render sequence.
///
/// Only active carousels with at least one product and active banners are
/// kept. Each list is ordered by its own `sort_order` (ties keep input
/// order), then sections alternate carousel, banner, carousel, banner...
/// Whatever is left of the longer list goes at the end.
///
/// An empty result means there is nothing curated to show.
#[must_use]
pub fn interleave(carousels: &[Carousel], banners: &[SlimBanner]) -> Vec<HomeSection> {
    let (carousels, banners) = eligible(carousels, banners);
    let mut out = Sequence::with_capacity(carousels.len() + banners.len());

    let mut carousels = carousels.into_iter();
    let mut banners = banners.into_iter();
    loop {
        let carousel = carousels.next();
        let banner = banners.next();
        if carousel.is_none() && banner.is_none() {
            break;
        }
        if let Some(carousel) = carousel {
            out.push_carousel(carousel);
        }
        if let Some(banner) = banner {
            out.push_banner(banner);
        }
    }

    out.into_inner()
}

/// Like [`interleave`], but with up to `carousels_per_banner` carousels
/// before each banner.
///
/// Banners left over once the carousels run out are appended. A ratio of
/// zero behaves like one.
#[must_use]
pub fn interleave_with_ratio(
    carousels: &[Carousel],
    banners: &[SlimBanner],
    carousels_per_banner: usize,
) -> Vec<HomeSection> {
    let per_banner = carousels_per_banner.max(1);
    let (carousels, banners) = eligible(carousels, banners);
    let mut out = Sequence::with_capacity(carousels.len() + banners.len());

    let mut banners = banners.into_iter();
    for group in carousels.chunks(per_banner) {
        for carousel in group {
            out.push_carousel(carousel);
        }
        if let Some(banner) = banners.next() {
            out.push_banner(banner);
        }
    }
    for banner in banners {
        out.push_banner(banner);
    }

    out.into_inner()
}

fn eligible<'a>(
    carousels: &'a [Carousel],
    banners: &'a [SlimBanner],
) -> (Vec<&'a Carousel>, Vec<&'a SlimBanner>) {
    let mut carousels: Vec<&Carousel> = carousels.iter().filter(|c| c.is_displayable()).collect();
    // sort_by_key is stable
    carousels.sort_by_key(|c| c.sort_order);

    let mut banners: Vec<&SlimBanner> = banners.iter().filter(|b| b.is_active).collect();
    banners.sort_by_key(|b| b.sort_order);

    (carousels, banners)
}

/// Output under construction; numbers sections by position.
struct Sequence(Vec<HomeSection>);

impl Sequence {
    fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    fn push_carousel(&mut self, carousel: &Carousel) {
        let sort_order = self.0.len();
        self.0.push(HomeSection::Carousel {
            id: carousel.id.clone(),
            sort_order,
            data: carousel.clone(),
        });
    }

    fn push_banner(&mut self, banner: &SlimBanner) {
        let sort_order = self.0.len();
        self.0.push(HomeSection::SlimBanner {
            id: banner.id.clone(),
            sort_order,
            data: banner.clone(),
        });
    }

    fn into_inner(self) -> Vec<HomeSection> {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use vitrina_core::{BannerPosition, CarouselType};

    use super::*;
    use crate::api::Product;
    use crate::home::HomeSectionKind;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            sku: format!("SKU-{id}"),
            name: format!("Producto {id}"),
            description: String::new(),
            regular_price: Decimal::new(1000, 0),
            sale_price: None,
            special_price: None,
            image_url: None,
            thumbnail_url: None,
            video_url: None,
            weight: None,
            dimension_length: None,
            dimension_width: None,
            dimension_height: None,
            category_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn carousel(id: &str, sort_order: i32) -> Carousel {
        Carousel {
            id: id.into(),
            name: id.to_uppercase(),
            slug: id.to_string(),
            description: None,
            carousel_type: CarouselType::Manual,
            category_id: None,
            sort_order,
            is_active: true,
            products: vec![product(&format!("{id}-p1"))],
            category: None,
        }
    }

    fn banner(id: &str, sort_order: i32) -> SlimBanner {
        SlimBanner {
            id: id.into(),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            link: None,
            position: BannerPosition::Top,
            is_active: true,
            sort_order,
        }
    }

    fn shape(sections: &[HomeSection]) -> Vec<(HomeSectionKind, String, usize)> {
        sections
            .iter()
            .map(|s| (s.kind(), s.id().to_string(), s.sort_order()))
            .collect()
    }

    #[test]
    fn test_sorts_each_list_then_alternates() {
        let sections = interleave(
            &[carousel("c1", 2), carousel("c2", 1)],
            &[banner("b1", 1)],
        );

        assert_eq!(
            shape(&sections),
            vec![
                (HomeSectionKind::Carousel, "c2".to_string(), 0),
                (HomeSectionKind::SlimBanner, "b1".to_string(), 1),
                (HomeSectionKind::Carousel, "c1".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_equal_counts_alternate_starting_with_carousel() {
        let carousels: Vec<_> = (0..4).map(|i| carousel(&format!("c{i}"), i)).collect();
        let banners: Vec<_> = (0..4).map(|i| banner(&format!("b{i}"), i)).collect();

        let sections = interleave(&carousels, &banners);

        assert_eq!(sections.len(), 8);
        for (i, section) in sections.iter().enumerate() {
            let expected = if i % 2 == 0 {
                HomeSectionKind::Carousel
            } else {
                HomeSectionKind::SlimBanner
            };
            assert_eq!(section.kind(), expected);
            assert_eq!(section.sort_order(), i);
        }
    }

    #[test]
    fn test_banners_only() {
        let sections = interleave(&[], &[banner("b1", 0)]);
        assert_eq!(
            shape(&sections),
            vec![(HomeSectionKind::SlimBanner, "b1".to_string(), 0)]
        );
    }

    #[test]
    fn test_carousels_only() {
        let sections = interleave(&[carousel("c1", 5), carousel("c2", 0)], &[]);
        assert_eq!(
            shape(&sections),
            vec![
                (HomeSectionKind::Carousel, "c2".to_string(), 0),
                (HomeSectionKind::Carousel, "c1".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_both_empty() {
        assert!(interleave(&[], &[]).is_empty());
    }

    #[test]
    fn test_longer_list_remainder_is_appended_in_order() {
        let sections = interleave(
            &[carousel("c1", 0)],
            &[banner("b3", 3), banner("b1", 1), banner("b2", 2)],
        );

        assert_eq!(
            shape(&sections),
            vec![
                (HomeSectionKind::Carousel, "c1".to_string(), 0),
                (HomeSectionKind::SlimBanner, "b1".to_string(), 1),
                (HomeSectionKind::SlimBanner, "b2".to_string(), 2),
                (HomeSectionKind::SlimBanner, "b3".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_ineligible_entries_are_dropped() {
        let mut empty = carousel("empty", 0);
        empty.products.clear();
        let mut hidden = carousel("hidden", 1);
        hidden.is_active = false;
        let mut off = banner("off", 0);
        off.is_active = false;

        let sections = interleave(
            &[empty, hidden, carousel("c1", 2)],
            &[off, banner("b1", 1)],
        );

        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|s| s.id() != "empty"));
        assert!(sections.iter().all(|s| s.id() != "hidden"));
        assert!(sections.iter().all(|s| s.id() != "off"));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let sections = interleave(
            &[carousel("first", 1), carousel("second", 1)],
            &[banner("b-first", 0), banner("b-second", 0)],
        );

        let ids: Vec<&str> = sections.iter().map(HomeSection::id).collect();
        assert_eq!(ids, vec!["first", "b-first", "second", "b-second"]);
    }

    #[test]
    fn test_same_input_same_output() {
        let carousels = vec![carousel("c1", 3), carousel("c2", 1), carousel("c3", 2)];
        let banners = vec![banner("b1", 9), banner("b2", -1)];

        assert_eq!(
            interleave(&carousels, &banners),
            interleave(&carousels, &banners)
        );
        // Inputs are left alone
        assert_eq!(carousels[0].id.as_str(), "c1");
    }

    #[test]
    fn test_section_embeds_source() {
        let sections = interleave(&[carousel("c1", 0)], &[banner("b1", 0)]);
        assert_eq!(sections[0].as_carousel().unwrap().products.len(), 1);
        assert!(sections[0].as_slim_banner().is_none());
        assert_eq!(
            sections[1].as_slim_banner().unwrap().image_url,
            "https://cdn.example.com/b1.jpg"
        );
    }

    #[test]
    fn test_section_serializes_with_type_tag() {
        let sections = interleave(&[], &[banner("b1", 4)]);
        let value = serde_json::to_value(&sections[0]).unwrap();
        assert_eq!(value["type"], "slim_banner");
        assert_eq!(value["id"], "b1");
        assert_eq!(value["sortOrder"], 0);
        assert_eq!(value["data"]["sortOrder"], 4);
    }

    #[test]
    fn test_ratio_two_carousels_per_banner() {
        let carousels: Vec<_> = (0..5).map(|i| carousel(&format!("c{i}"), i)).collect();
        let banners: Vec<_> = (0..4).map(|i| banner(&format!("b{i}"), i)).collect();

        let sections = interleave_with_ratio(&carousels, &banners, 2);
        let ids: Vec<&str> = sections.iter().map(HomeSection::id).collect();

        assert_eq!(
            ids,
            vec!["c0", "c1", "b0", "c2", "c3", "b1", "c4", "b2", "b3"]
        );
        assert!(
            sections
                .iter()
                .enumerate()
                .all(|(i, s)| s.sort_order() == i)
        );
    }

    #[test]
    fn test_ratio_one_matches_interleave() {
        let carousels = vec![carousel("c1", 0), carousel("c2", 1), carousel("c3", 2)];
        let banners = vec![banner("b1", 0)];

        assert_eq!(
            interleave_with_ratio(&carousels, &banners, 1),
            interleave(&carousels, &banners)
        );

        let banners = vec![banner("b1", 0), banner("b2", 1), banner("b3", 2), banner("b4", 3)];
        assert_eq!(
            interleave_with_ratio(&carousels[..1], &banners, 1),
            interleave(&carousels[..1], &banners)
        );
    }

    #[test]
    fn test_ratio_zero_behaves_like_one() {
        let carousels = vec![carousel("c1", 0), carousel("c2", 1)];
        let banners = vec![banner("b1", 0), banner("b2", 1)];

        assert_eq!(
            interleave_with_ratio(&carousels, &banners, 0),
            interleave(&carousels, &banners)
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        /// Carousels with mixed activity, possibly no products and
        /// colliding sort orders.
        fn arb_carousels() -> impl Strategy<Value = Vec<Carousel>> {
            prop::collection::vec((any::<bool>(), 0..3usize, 0..4i32), 0..8).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (is_active, product_count, sort_order))| {
                        let mut c = carousel(&format!("c{i}"), sort_order);
                        c.is_active = is_active;
                        c.products = (0..product_count)
                            .map(|p| product(&format!("c{i}-p{p}")))
                            .collect();
                        c
                    })
                    .collect()
            })
        }

        fn arb_banners() -> impl Strategy<Value = Vec<SlimBanner>> {
            prop::collection::vec((any::<bool>(), 0..4i32), 0..8).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (is_active, sort_order))| {
                        let mut b = banner(&format!("b{i}"), sort_order);
                        b.is_active = is_active;
                        b
                    })
                    .collect()
            })
        }

        fn eligible_counts(carousels: &[Carousel], banners: &[SlimBanner]) -> (usize, usize) {
            (
                carousels
                    .iter()
                    .filter(|c| c.is_active && !c.products.is_empty())
                    .count(),
                banners.iter().filter(|b| b.is_active).count(),
            )
        }

        proptest! {
            /// Every eligible carousel and banner appears exactly once.
            #[test]
            fn length_is_the_eligible_count(carousels in arb_carousels(), banners in arb_banners()) {
                let (c, b) = eligible_counts(&carousels, &banners);
                prop_assert_eq!(interleave(&carousels, &banners).len(), c + b);
            }

            /// Sections are numbered 0..len by position.
            #[test]
            fn sort_orders_are_positions(carousels in arb_carousels(), banners in arb_banners()) {
                let sections = interleave(&carousels, &banners);
                let orders: Vec<usize> = sections.iter().map(HomeSection::sort_order).collect();
                prop_assert_eq!(orders, (0..sections.len()).collect::<Vec<_>>());
            }

            /// Inactive or empty carousels and inactive banners never show.
            #[test]
            fn ineligible_ids_never_appear(carousels in arb_carousels(), banners in arb_banners()) {
                let sections = interleave(&carousels, &banners);
                for c in carousels.iter().filter(|c| !c.is_active || c.products.is_empty()) {
                    prop_assert!(sections.iter().all(|s| s.id() != c.id.as_str()));
                }
                for b in banners.iter().filter(|b| !b.is_active) {
                    prop_assert!(sections.iter().all(|s| s.id() != b.id.as_str()));
                }
            }

            /// The same input always yields the same sequence.
            #[test]
            fn output_is_deterministic(carousels in arb_carousels(), banners in arb_banners()) {
                prop_assert_eq!(interleave(&carousels, &banners), interleave(&carousels, &banners));
            }

            /// The alternating prefix starts with a carousel and runs for
            /// twice the shorter list.
            #[test]
            fn sections_alternate_while_both_lists_last(
                carousels in arb_carousels(),
                banners in arb_banners(),
            ) {
                let (c, b) = eligible_counts(&carousels, &banners);
                let sections = interleave(&carousels, &banners);
                for (i, section) in sections.iter().take(2 * c.min(b)).enumerate() {
                    let expected = if i % 2 == 0 {
                        HomeSectionKind::Carousel
                    } else {
                        HomeSectionKind::SlimBanner
                    };
                    prop_assert_eq!(section.kind(), expected);
                }
            }

            /// Ratio one is plain interleaving.
            #[test]
            fn ratio_one_matches_interleave(carousels in arb_carousels(), banners in arb_banners()) {
                prop_assert_eq!(
                    interleave_with_ratio(&carousels, &banners, 1),
                    interleave(&carousels, &banners)
                );
            }
        }
    }
}
