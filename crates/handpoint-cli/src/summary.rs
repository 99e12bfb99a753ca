use std::path::Path;

use console::Style;
use handpoint_core::io::upload::SourceImage;
use handpoint_core::protocol::UsageStats;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
    dim: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
            dim: Style::new().dim().yellow(),
        }
    }
}

pub fn print_upload_summary(file: &Path, image: &SourceImage, server_url: &str) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<10}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(file.display())
    );
    let resized = if image.downscaled {
        s.dim
            .apply_to(format!(" (downscaled from {})", image.original))
            .to_string()
    } else {
        String::new()
    };
    println!(
        "  {:<10}{}{}",
        s.label.apply_to("Upload"),
        s.value.apply_to(format!("{}x{} {}", image.width, image.height, image.mime)),
        resized
    );
    println!(
        "  {:<10}{}",
        s.label.apply_to("Server"),
        s.path.apply_to(server_url)
    );
    println!();
}

pub fn print_stats(stats: &UsageStats) {
    let s = Styles::new();

    println!();
    println!(
        "  {}",
        s.title
            .apply_to(format!("Usage over the last {} day(s)", stats.period_days))
    );
    println!("  {}", s.title.apply_to("\u{2550}".repeat(30)));
    println!();
    println!(
        "  {:<26}{}",
        s.label.apply_to("Unique users"),
        s.value.apply_to(stats.unique_users)
    );
    println!(
        "  {:<26}{}",
        s.label.apply_to("Total events"),
        s.value.apply_to(stats.total_events())
    );
    println!();

    if stats.event_counts.is_empty() {
        println!("  {}", s.dim.apply_to("No events recorded"));
    }

    let mut counts: Vec<_> = stats.event_counts.iter().collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.event_type.cmp(&b.event_type)));
    for c in counts {
        println!(
            "    {:<24}{}",
            s.label.apply_to(&c.event_type),
            s.value.apply_to(c.count)
        );
    }
    println!();
}
