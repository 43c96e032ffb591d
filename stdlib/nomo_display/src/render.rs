use nomo_core::{Explanation, HIGH_THRESHOLD, MODERATE_THRESHOLD};

use crate::gradient::{color_at, RISK_GRADIENT};
use crate::locale::{feature_label, Labels, Locale};
use crate::view::ScoreView;

/// Narrowest text bar that still fits the 0-100 tick labels.
pub const MIN_BAR_WIDTH: usize = 31;

fn shade(t: f64) -> char {
    if t >= HIGH_THRESHOLD {
        '▓'
    } else if t >= MODERATE_THRESHOLD {
        '▒'
    } else {
        '░'
    }
}

fn column(position: f64, width: usize) -> usize {
    let last = (width - 1) as f64;
    ((position.clamp(0.0, 100.0) / 100.0) * last).round() as usize
}

/// Headline, risk level and a character gradient bar with a marker.
pub fn render_text(view: &ScoreView, labels: &Labels, width: usize) -> String {
    let width = width.max(MIN_BAR_WIDTH);
    let marker = column(view.gradient_marker_position, width);
    let percent = format!("{}%", view.probability_percent);

    let mut out = String::new();
    out.push_str(&format!("{}{}{percent}\n", labels.headline, labels.colon));
    out.push_str(&format!(
        "{}{}{}\n\n",
        labels.risk_level,
        labels.colon,
        labels.band(view.risk_band)
    ));

    let label_start = marker
        .saturating_sub(percent.len() / 2)
        .min(width.saturating_sub(percent.len()));
    out.push_str(&" ".repeat(label_start));
    out.push_str(&percent);
    out.push('\n');
    out.push_str(&" ".repeat(marker));
    out.push_str("▼\n");

    let last = (width - 1) as f64;
    let bar: String = (0..width).map(|c| shade(c as f64 / last)).collect();
    out.push_str(&bar);
    out.push('\n');

    let mut ticks = vec![' '; width + 3];
    let mut next_free = 0;
    for k in 0..=10 {
        let text = (k * 10).to_string();
        let col = column((k * 10) as f64, width);
        if col < next_free {
            continue;
        }
        for (i, ch) in text.chars().enumerate() {
            ticks[col + i] = ch;
        }
        next_free = col + text.len() + 1;
    }
    let ticks: String = ticks.into_iter().collect();
    out.push_str(ticks.trim_end());
    out.push('\n');

    let caption_pad = (width / 2).saturating_sub(labels.axis.chars().count() / 2);
    out.push_str(&" ".repeat(caption_pad));
    out.push_str(labels.axis);
    out.push('\n');
    out
}

/// Per-feature breakdown of the logit, largest contribution first.
pub fn render_contributions(explanation: &Explanation, locale: Locale) -> String {
    let labels = crate::locale::labels(locale);
    let mut out = format!("{}{}\n", labels.contributions, labels.colon.trim_end());
    out.push_str(&format!(
        "  {:<28} {:>20} {:>+9.3}\n",
        labels.intercept, "", explanation.intercept
    ));
    for c in explanation.ranked() {
        let term = format!("{} × {}", c.value, c.weight);
        out.push_str(&format!(
            "  {:<28} {:>20} {:>+9.3}\n",
            feature_label(locale, &c.feature),
            term,
            c.contribution
        ));
    }
    out.push_str(&format!("  logit = {:.3}\n", explanation.result.logit));
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Gradient bar spanning 0-100 % with ticks every 10 and a dashed marker.
pub fn render_svg(view: &ScoreView, labels: &Labels, width: u32, height: u32) -> String {
    if width == 0 || height == 0 {
        return String::new();
    }
    let w = width as f64;
    let h = height as f64;
    let margin = (w / 4.0).min(20.0);
    let bar_x = margin;
    let bar_w = w - 2.0 * margin;
    let bar_y = h * 0.3;
    let bar_h = h * 0.3;
    let bar_bottom = bar_y + bar_h;
    let position = view.gradient_marker_position.clamp(0.0, 100.0) / 100.0;
    let marker_x = bar_x + bar_w * position;
    let marker_fill = color_at(position);

    let mut stops = String::new();
    for (t, color) in RISK_GRADIENT.iter() {
        stops.push_str(&format!(
            "<stop offset=\"{:.0}%\" stop-color=\"{}\" />",
            t * 100.0,
            color.hex()
        ));
    }

    let mut ticks = String::new();
    for k in 0..=10 {
        let x = bar_x + bar_w * (k as f64) / 10.0;
        ticks.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{bar_bottom:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"black\" stroke-width=\"1\" />",
            bar_bottom + 4.0
        ));
        ticks.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{:.2}\" font-size=\"10\" text-anchor=\"middle\">{}</text>",
            bar_bottom + 15.0,
            k * 10
        ));
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
<defs><linearGradient id=\"risk\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">{stops}</linearGradient></defs>\
<rect x=\"{bar_x:.2}\" y=\"{bar_y:.2}\" width=\"{bar_w:.2}\" height=\"{bar_h:.2}\" fill=\"url(#risk)\" />\
{ticks}\
<line x1=\"{marker_x:.2}\" y1=\"{:.2}\" x2=\"{marker_x:.2}\" y2=\"{bar_bottom:.2}\" stroke=\"black\" stroke-width=\"2\" stroke-dasharray=\"4 3\" />\
<circle cx=\"{marker_x:.2}\" cy=\"{bar_y:.2}\" r=\"4\" fill=\"{marker_fill}\" stroke=\"black\" />\
<text x=\"{marker_x:.2}\" y=\"{:.2}\" font-size=\"10\" text-anchor=\"middle\">{}%</text>\
<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"10\" text-anchor=\"middle\">{}</text>\
</svg>",
        bar_y - 2.0,
        bar_y - 5.0,
        escape_xml(&view.probability_percent),
        w / 2.0,
        (bar_bottom + 28.0).min(h - 1.0),
        escape_xml(labels.axis),
    )
}
