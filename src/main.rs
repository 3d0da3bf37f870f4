use std::env;
use std::error::Error;

use annotext::{sample_memo_demo, AnnotextConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if env::var("ANNOTEXT_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    // Optional YAML config path as the only argument.
    let cfg = match env::args().nth(1) {
        Some(path) => AnnotextConfig::from_file(path)?,
        None => AnnotextConfig::default(),
    };

    let report = sample_memo_demo(&cfg)?;

    println!(
        "Matched {} of {} annotations ({} unmatched)",
        report.stats.matched, report.stats.provided, report.stats.unmatched
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
