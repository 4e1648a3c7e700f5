use console::Style;
use photoresizer_core::config::ResizerConfig;
use photoresizer_core::state::EditState;
use photoresizer_core::units::format_file_size;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    good: Style,
    bad: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            bad: Style::new().red(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn dims(width: Option<u32>, height: Option<u32>) -> String {
    match (width, height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        _ => "unknown".to_string(),
    }
}

fn size(bytes: Option<u64>) -> String {
    bytes.map_or_else(|| "unknown".to_string(), |b| format_file_size(b as i64))
}

pub fn print_settings(state: &EditState, config: &ResizerConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Photo Resizer"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();

    if let Some(ref source) = state.image_source {
        println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(source));
    }
    println!(
        "  {:<14}{}, {}",
        s.label.apply_to("Original"),
        s.value.apply_to(dims(state.original_width, state.original_height)),
        s.value.apply_to(size(state.original_size))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Target"),
        s.value
            .apply_to(format!("{}x{}", state.target_width, state.target_height))
    );
    if state.format.is_lossless() {
        println!(
            "  {:<14}{} {}",
            s.label.apply_to("Format"),
            s.value.apply_to(state.format),
            s.disabled.apply_to("(lossless, quality ignored)")
        );
    } else {
        println!(
            "  {:<14}{} @ {}",
            s.label.apply_to("Format"),
            s.value.apply_to(state.format),
            s.value.apply_to(state.quality)
        );
    }
    if let Some(estimated) = state.estimated_size {
        println!(
            "  {:<14}~{}",
            s.label.apply_to("Estimate"),
            s.value.apply_to(format_file_size(estimated as i64))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tool"),
        s.path.apply_to(config.tool.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Gallery"),
        s.path.apply_to(config.album_dir().display())
    );
    println!();
}

pub fn print_result(label: &str, state: &EditState) {
    let s = Styles::new();

    println!("  {}", s.title.apply_to(label));
    if let Some(ref output) = state.compressed_source {
        println!("    {:<12}{}", s.label.apply_to("File"), s.path.apply_to(output));
    }
    println!(
        "    {:<12}{}, {}",
        s.label.apply_to("Output"),
        s.value
            .apply_to(dims(state.compressed_width, state.compressed_height)),
        s.value.apply_to(size(state.compressed_size))
    );
    if let Some(reduced) = state.reduced_size {
        let style = if reduced >= 0 { &s.good } else { &s.bad };
        let text = if reduced >= 0 {
            format!("-{}", format_file_size(reduced))
        } else {
            format!("+{}", format_file_size(-reduced))
        };
        println!("    {:<12}{}", s.label.apply_to("Change"), style.apply_to(text));
    }
    println!();
}
