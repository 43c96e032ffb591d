//! Green-to-red risk color map (a reversed red-yellow-green diverging scale).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Color stops as (position in `[0, 1]`, color); low risk is green.
pub const RISK_GRADIENT: [(f64, Rgb); 5] = [
    (0.0, Rgb(0x1a, 0x98, 0x50)),
    (0.25, Rgb(0xa6, 0xd9, 0x6a)),
    (0.5, Rgb(0xff, 0xff, 0xbf)),
    (0.75, Rgb(0xfd, 0xae, 0x61)),
    (1.0, Rgb(0xd7, 0x30, 0x27)),
];

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Color at position `t`; values outside `[0, 1]` are clamped.
pub fn color_at(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    for pair in RISK_GRADIENT.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return Rgb(lerp(c0.0, c1.0, f), lerp(c0.1, c1.1, f), lerp(c0.2, c1.2, f));
        }
    }
    RISK_GRADIENT[RISK_GRADIENT.len() - 1].1
}
