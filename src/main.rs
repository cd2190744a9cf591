use anyhow::Result;
use std::env;
use std::path::Path;
use std::time::Duration;

use afsc_annotator::{
    build_annotation, AnnotatorLoop, BotConfig, JsonlStream, PidLock, ProcessedLedger,
    ReferenceDataset, REPLY_HEADER,
};

const CONFIG_FILE: &str = "annotator.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("run") if args.len() > 2 => run_stream(Path::new(&args[2])),
        Some("annotate") if args.len() > 2 => run_annotate(&args[2]),
        _ => {
            eprintln!("Usage:");
            eprintln!("  afsc-annotator run <items.jsonl>    replay a stream of items");
            eprintln!("  afsc-annotator annotate <text>      annotate one text and exit");
            std::process::exit(2);
        }
    }
}

fn run_stream(items_path: &Path) -> Result<()> {
    let config = load_config()?;

    println!(
        "AFSC annotator starting (bot identity: {})",
        config.bot_username
    );

    let _lock = PidLock::acquire(&config.pid_path)?;

    let dataset = ReferenceDataset::load(&config.data_dir)?;
    println!(
        "✓ Loaded reference tables: {} enlisted / {} officer base codes",
        dataset.enlisted.base.len(),
        dataset.officer.base.len()
    );

    let ledger = ProcessedLedger::open(&config.ledger_path)?;
    println!(
        "✓ Ledger open at {} ({} items recorded)",
        config.ledger_path.display(),
        ledger.count()?
    );

    let mut stream = JsonlStream::open(items_path)?;
    println!("✓ Streaming items from {}", items_path.display());

    let mut worker = AnnotatorLoop::new(dataset, ledger, config.bot_username).with_retry_delays(
        Duration::from_secs(config.retry_initial_secs),
        Duration::from_secs(config.retry_max_secs),
    );

    let summary = worker.run(&mut stream)?;

    println!(
        "✓ Stream drained: {} items seen, {} replies posted, {} skipped",
        summary.items_seen, summary.replies_posted, summary.items_skipped
    );

    Ok(())
}

fn run_annotate(text: &str) -> Result<()> {
    let config = load_config()?;

    let dataset = ReferenceDataset::load(&config.data_dir)?;
    let annotation = build_annotation(text, &dataset);

    if annotation.is_empty() {
        println!("No recognized codes.");
    } else {
        print!("{}{}", REPLY_HEADER, annotation.body);
    }

    Ok(())
}

fn load_config() -> Result<BotConfig> {
    if Path::new(CONFIG_FILE).exists() {
        BotConfig::from_file(CONFIG_FILE)
    } else {
        Ok(BotConfig::default())
    }
}
