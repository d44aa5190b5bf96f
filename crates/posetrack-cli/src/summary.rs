use std::collections::BTreeMap;

use console::Style;
use posetrack_core::detection::{Detection, DetectionResult};
use posetrack_core::physical::PhysicalCoordinate;
use posetrack_core::relative::Offset;

struct Styles {
    header: Style,
    label: Style,
    value: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_detections(points: &DetectionResult) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Detected markers"));
    if points.is_empty() {
        println!("    {}", s.disabled.apply_to("none"));
    }
    for (color, detection) in points {
        let text = match detection {
            Detection::Single(p) => p.to_string(),
            Detection::Multiple(ps) => join(ps.iter().map(|p| p.to_string())),
        };
        println!("    {:<10}{}", s.label.apply_to(color), s.value.apply_to(text));
    }
}

pub fn print_offsets(origin: &str, offsets: &BTreeMap<String, Offset>) {
    let s = Styles::new();

    println!();
    println!(
        "  {}",
        s.header.apply_to(format!("Offsets relative to {origin} (pixels)"))
    );
    if offsets.is_empty() {
        println!("    {}", s.disabled.apply_to("none"));
    }
    for (color, offset) in offsets {
        let text = join(offset.offsets().iter().map(|o| o.to_string()));
        println!("    {:<10}{}", s.label.apply_to(color), s.value.apply_to(text));
    }
}

pub fn print_physical(color: &str, coord: &PhysicalCoordinate) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Physical position (m)"));
    println!("    {:<10}{}", s.label.apply_to(color), s.value.apply_to(coord));
    println!();
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
