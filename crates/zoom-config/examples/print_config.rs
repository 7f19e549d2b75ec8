/// Example program to print the loaded configuration
///
/// Run with: cargo run -p zoom-config --example print_config

fn main() {
    let config = zoom_config::ZoomConfig::load();

    println!("=== Zoom Configuration ===\n");

    println!("Durations (ms):");
    println!("  Shortest: {}", config.durations.shortest);
    println!("  Shorter: {}", config.durations.shorter);
    println!("  Short: {}", config.durations.short);
    println!("  Standard: {}", config.durations.standard);
    println!("  Complex: {}", config.durations.complex);
    println!("  Entering Screen: {}", config.durations.entering_screen);
    println!("  Leaving Screen: {}", config.durations.leaving_screen);
    println!();

    println!("Controller Defaults:");
    println!("  Enter: {:?} ({:?} ms override)", config.zoom.enter, config.zoom.enter_ms);
    println!("  Exit: {:?} ({:?} ms override)", config.zoom.exit, config.zoom.exit_ms);
    println!("  Easing: {}", config.default_easing_css());
    println!("  Appear: {}", config.zoom.appear);
    println!("  Size Scaling: {}", config.zoom.size_scaling);
    println!("  Manual Fallback: {}", config.zoom.manual_fallback);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
