//! Presentation of nomogram scores.
//!
//! The scorer hands over a [`nomo_core::ScoreResult`]; this crate turns it
//! into a [`ScoreView`] (percentage text, band, marker position) and renders
//! that as terminal text or SVG in English or Chinese.

pub mod gradient;
pub mod locale;
pub mod render;
pub mod view;

pub use gradient::{color_at, Rgb, RISK_GRADIENT};
pub use locale::{feature_label, labels, parse_yes_no, Labels, Locale, LocaleError};
pub use render::{render_contributions, render_svg, render_text};
pub use view::{format_percent, ScoreView};
