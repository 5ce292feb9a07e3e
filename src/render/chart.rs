use std::f64::consts::TAU;
use std::fmt::Write as _;

use crate::compute::Amounts;

pub const CENTER: f64 = 100.0;
pub const RADIUS: f64 = 100.0;

/// Slice colors, reused cyclically.
pub const PALETTE: [&str; 5] = ["#4caf50", "#81c784", "#66bb6a", "#388e3c", "#2e7d32"];

/// One sector of the category pie chart. Angles are in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub angle_start: f64,
    pub angle_end: f64,
    pub color: &'static str,
}

impl Slice {
    /// Set when the sector spans more than half the circle.
    pub fn large_arc(&self) -> bool {
        self.fraction > 0.5
    }

    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }

    pub fn start_point(&self) -> (f64, f64) {
        point_at(self.angle_start)
    }

    pub fn end_point(&self) -> (f64, f64) {
        point_at(self.angle_end)
    }

    /// SVG element for this sector. A slice covering the whole circle has
    /// coincident arc endpoints, so it is drawn as a circle instead.
    pub fn svg_element(&self) -> String {
        if self.fraction >= 1.0 - f64::EPSILON {
            return format!(
                r#"<circle cx="{CENTER}" cy="{CENTER}" r="{RADIUS}" fill="{}" />"#,
                self.color
            );
        }
        let (x1, y1) = self.start_point();
        let (x2, y2) = self.end_point();
        format!(
            r#"<path d="M{CENTER},{CENTER} L{x1:.3},{y1:.3} A{RADIUS},{RADIUS} 0 {},1 {x2:.3},{y2:.3} Z" fill="{}" />"#,
            u8::from(self.large_arc()),
            self.color
        )
    }
}

fn point_at(angle: f64) -> (f64, f64) {
    (CENTER + RADIUS * angle.cos(), CENTER + RADIUS * angle.sin())
}

/// Proportional breakdown of the emission categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PieChart {
    slices: Vec<Slice>,
    total: f64,
}

impl PieChart {
    /// Builds slices from cumulative angle offsets. Negative, non-finite and
    /// zero entries are skipped; an all-zero mapping gives an empty chart.
    pub fn from_amounts(amounts: &Amounts) -> Self {
        let total = amounts.total();
        if total <= 0.0 {
            return Self::default();
        }

        let mut slices = Vec::new();
        let mut angle_start = 0.0;
        for (label, value) in amounts.iter() {
            if !value.is_finite() || value <= 0.0 {
                continue;
            }
            let fraction = value / total;
            let angle_end = angle_start + fraction * TAU;
            slices.push(Slice {
                label: label.to_string(),
                value,
                fraction,
                angle_start,
                angle_end,
                color: PALETTE[slices.len() % PALETTE.len()],
            });
            angle_start = angle_end;
        }

        Self { slices, total }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Standalone SVG of the chart (220px, 200-unit viewbox).
    pub fn to_svg(&self) -> String {
        let mut svg = String::from(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="220" height="220" viewBox="0 0 200 200">"#,
        );
        for slice in &self.slices {
            let _ = write!(svg, "{}", slice.svg_element());
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(entries: &[(&str, f64)]) -> Amounts {
        Amounts::from(
            entries
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn fractions_sum_to_one() {
        let chart = PieChart::from_amounts(&amounts(&[
            ("Energy", 100.8),
            ("Transport", 998.4),
            ("Food", 2808.0),
            ("Travel", 360.0),
            ("Waste", 98.8),
        ]));
        let sum: f64 = chart.slices().iter().map(|slice| slice.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        let last = chart.slices().last().unwrap();
        assert!((last.angle_end - TAU).abs() < 1e-9);
    }

    #[test]
    fn slices_are_contiguous() {
        let chart = PieChart::from_amounts(&amounts(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]));
        for pair in chart.slices().windows(2) {
            assert_eq!(pair[0].angle_end, pair[1].angle_start);
        }
        assert_eq!(chart.slices()[0].angle_start, 0.0);
    }

    #[test]
    fn large_arc_only_above_half() {
        let chart = PieChart::from_amounts(&amounts(&[("big", 3.0), ("small", 1.0)]));
        assert!(chart.slices()[0].large_arc());
        assert!(!chart.slices()[1].large_arc());
        assert!(chart.slices()[0].svg_element().contains(" 0 1,1 "));

        let halves = PieChart::from_amounts(&amounts(&[("a", 1.0), ("b", 1.0)]));
        assert!(halves.slices().iter().all(|slice| !slice.large_arc()));
    }

    #[test]
    fn first_slice_starts_at_three_oclock() {
        let chart = PieChart::from_amounts(&amounts(&[("a", 1.0), ("b", 1.0)]));
        assert_eq!(chart.slices()[0].start_point(), (200.0, 100.0));
        let (x, y) = chart.slices()[0].end_point();
        assert!((x - 0.0).abs() < 1e-9 && (y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_category_is_a_full_circle() {
        let chart = PieChart::from_amounts(&amounts(&[("only", 42.0), ("zero", 0.0)]));
        assert_eq!(chart.slices().len(), 1);
        assert!(chart.to_svg().contains("<circle"));
    }

    #[test]
    fn zero_or_invalid_totals_give_empty_chart() {
        assert!(PieChart::from_amounts(&amounts(&[])).is_empty());
        assert!(PieChart::from_amounts(&amounts(&[("a", 0.0), ("b", -3.0)])).is_empty());
        let chart = PieChart::from_amounts(&amounts(&[("a", f64::NAN), ("b", 2.0)]));
        assert_eq!(chart.slices().len(), 1);
    }

    #[test]
    fn colors_cycle_through_palette() {
        let entries: Vec<(String, f64)> = (0..7).map(|i| (format!("c{i}"), 1.0)).collect();
        let chart = PieChart::from_amounts(&Amounts::from(entries));
        assert_eq!(chart.slices()[5].color, PALETTE[0]);
        assert_eq!(chart.slices()[6].color, PALETTE[1]);
    }
}
