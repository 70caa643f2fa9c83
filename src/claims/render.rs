//! Visual encoding of a tile's claim field.
//!
//! A single claimant paints the tile flat; several claimants split it into
//! equal conic segments. Segments are ordered by color name, never by arrival,
//! so every viewer paints the same set the same way.

use std::fmt::Write as _;

use serde::Serialize;

use super::{code::ClaimantCode, set::ClaimSet};

/// Angle the first gradient segment starts at.
pub const GRADIENT_START_DEG: u16 = 0;

/// Named color a claimant code paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimColor {
    /// Display name, also the gradient sort key.
    pub name: &'static str,
    /// CSS hex color.
    pub css: &'static str,
}

const COLOR_TABLE: [ClaimColor; 8] = [
    ClaimColor { name: "Red", css: "#e53935" },
    ClaimColor { name: "Blue", css: "#1e88e5" },
    ClaimColor { name: "Green", css: "#43a047" },
    ClaimColor { name: "Yellow", css: "#fdd835" },
    ClaimColor { name: "Purple", css: "#8e24aa" },
    ClaimColor { name: "Orange", css: "#fb8c00" },
    ClaimColor { name: "Pink", css: "#d81b60" },
    ClaimColor { name: "Cyan", css: "#00acc1" },
];

impl ClaimantCode {
    /// Color this code paints with.
    pub fn color(self) -> ClaimColor {
        COLOR_TABLE[self as usize]
    }
}

/// One angular slice of a multi-claim gradient, bounds in percent of a full turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientSegment {
    /// Color of the slice.
    pub color: ClaimColor,
    /// Where the slice starts.
    pub start_percent: f64,
    /// Where the slice ends.
    pub end_percent: f64,
}

/// Style a tile is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClaimStyle {
    /// No claimant; drawn without background.
    Unclaimed,
    /// Single claimant's color.
    Flat(ClaimColor),
    /// Equal slices, one per claimant, ordered by color name.
    Gradient(Vec<GradientSegment>),
}

impl ClaimStyle {
    /// CSS `background` value, `None` for unclaimed tiles.
    pub fn to_css(&self) -> Option<String> {
        match self {
            ClaimStyle::Unclaimed => None,
            ClaimStyle::Flat(color) => Some(color.css.to_owned()),
            ClaimStyle::Gradient(segments) => {
                let mut css = format!("conic-gradient(from {GRADIENT_START_DEG}deg");
                for segment in segments {
                    let _ = write!(
                        css,
                        ", {} {}% {}%",
                        segment.color.css,
                        format_percent(segment.start_percent),
                        format_percent(segment.end_percent)
                    );
                }
                css.push(')');
                Some(css)
            }
        }
    }
}

/// Style for a validated claim set.
pub fn render(claims: &ClaimSet) -> ClaimStyle {
    let mut colors = claims.iter().map(ClaimantCode::color).collect::<Vec<_>>();
    match colors.len() {
        0 => ClaimStyle::Unclaimed,
        1 => ClaimStyle::Flat(colors[0]),
        count => {
            colors.sort_by_key(|color| color.name.to_lowercase());
            let width = 100.0 / count as f64;
            let segments = colors
                .into_iter()
                .enumerate()
                .map(|(index, color)| GradientSegment {
                    color,
                    start_percent: index as f64 * width,
                    end_percent: (index + 1) as f64 * width,
                })
                .collect();
            ClaimStyle::Gradient(segments)
        }
    }
}

/// Style for a claim string as received from the server; unknown characters are skipped.
pub fn render_raw(raw: &str) -> ClaimStyle {
    render(&ClaimSet::parse_lenient(raw))
}

fn format_percent(value: f64) -> String {
    let rounded = format!("{value:.4}");
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;

    #[test]
    fn color_table_is_injective() {
        let mut names = ClaimantCode::ALL
            .iter()
            .map(|code| code.color().name.to_lowercase())
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn empty_claim_is_unclaimed() {
        assert_eq!(render(&ClaimSet::new()), ClaimStyle::Unclaimed);
        assert_eq!(ClaimStyle::Unclaimed.to_css(), None);
    }

    #[test]
    fn single_claim_is_flat() {
        let style = render_raw("1");
        assert_eq!(style, ClaimStyle::Flat(ClaimantCode::One.color()));
        assert_eq!(style.to_css().as_deref(), Some("#e53935"));
    }

    #[test]
    fn gradient_orders_segments_by_color_name() {
        // Red, Cyan, Blue arrive in that order
        let ClaimStyle::Gradient(segments) = render_raw("182") else {
            panic!("expected gradient");
        };
        let names = segments.iter().map(|s| s.color.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Blue", "Cyan", "Red"]);
    }

    #[test]
    fn gradient_splits_the_turn_evenly() {
        let style = render_raw("25");
        assert_eq!(
            style.to_css().as_deref(),
            Some("conic-gradient(from 0deg, #1e88e5 0% 50%, #8e24aa 50% 100%)")
        );

        let css = render_raw("123").to_css().unwrap();
        assert_eq!(
            css,
            "conic-gradient(from 0deg, #1e88e5 0% 33.3333%, #43a047 33.3333% 66.6667%, #e53935 66.6667% 100%)"
        );
    }

    #[test]
    fn rendering_ignores_arrival_order() {
        let mut codes = ClaimantCode::ALL.to_vec();
        let mut rng = rand::rng();
        let reference = render(&codes.iter().copied().fold(ClaimSet::new(), |mut set, c| {
            set.insert(c);
            set
        }));

        for _ in 0..32 {
            codes.shuffle(&mut rng);
            let take = 2 + (codes.len() - 2) / 2;
            let subset = &codes[..take];
            let forward = subset.iter().fold(ClaimSet::new(), |mut set, c| {
                set.insert(*c);
                set
            });
            let backward = subset.iter().rev().fold(ClaimSet::new(), |mut set, c| {
                set.insert(*c);
                set
            });
            assert_eq!(render(&forward), render(&backward));
            assert_eq!(render(&forward).to_css(), render(&backward).to_css());
        }

        let mut all = ClaimantCode::ALL.to_vec();
        all.shuffle(&mut rng);
        let shuffled = all.into_iter().fold(ClaimSet::new(), |mut set, c| {
            set.insert(c);
            set
        });
        assert_eq!(render(&shuffled), reference);
    }

    #[test]
    fn unknown_characters_are_skipped() {
        assert_eq!(render_raw("x"), ClaimStyle::Unclaimed);
        assert_eq!(render_raw("9z3"), ClaimStyle::Flat(ClaimantCode::Three.color()));
    }
}
