use iwasp_site_editor::{
    ColorPalette, CustomizationSnapshot, EditorConfig, EditorError, compose_with_config,
    extract_with_config,
};
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("Usage: site-compose [--config editor.yaml] <command> ...");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  extract <base.html>                                   list editable fields as JSON");
    eprintln!("  compose <base.html> <customizations.json> [palette.yaml]  print the rendered document");
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = match take_config(&mut args) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let result = match args.first().map(String::as_str) {
        Some("extract") if args.len() == 2 => run_extract(&args[1], &config),
        Some("compose") if args.len() == 3 || args.len() == 4 => {
            run_compose(&args[1], &args[2], args.get(3).map(String::as_str), &config)
        }
        _ => usage(),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => fail(&e),
    }
}

fn take_config(args: &mut Vec<String>) -> Result<EditorConfig, EditorError> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(EditorConfig::default());
    };
    if pos + 1 >= args.len() {
        usage();
    }
    let path = args.remove(pos + 1);
    args.remove(pos);
    EditorConfig::from_file(Path::new(&path))
}

fn run_extract(base_path: &str, config: &EditorConfig) -> Result<String, EditorError> {
    let base = fs::read_to_string(base_path)?;
    let descriptors = extract_with_config(&base, config);
    if descriptors.is_empty() {
        eprintln!("No editable text detected in {}", base_path);
    }
    Ok(serde_json::to_string_pretty(&descriptors)?)
}

fn run_compose(
    base_path: &str,
    customizations_path: &str,
    palette_path: Option<&str>,
    config: &EditorConfig,
) -> Result<String, EditorError> {
    let base = fs::read_to_string(base_path)?;
    let snapshot = CustomizationSnapshot::from_json(&fs::read_to_string(customizations_path)?)?;
    let palette = match palette_path {
        Some(path) => ColorPalette::from_yaml(&fs::read_to_string(path)?)?,
        None => ColorPalette::new(),
    };
    Ok(compose_with_config(&base, &snapshot, &palette, config))
}

fn fail(error: &EditorError) -> ! {
    eprintln!("✗ {}", error);
    process::exit(1);
}
