use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// Import from wordcheck-core
use wordcheck_core::{CheckConfig, CheckStages, DocumentChecker, Report, StepProfiler, OUTPUT_FORMATS};

// Import CLI utilities
use wordcheck::SofficeConverter;

#[derive(Parser)]
#[command(name = "wordcheck")]
#[command(about = "Check Word documents for required phrases, forbidden words and typing mistakes")]
struct Args {
    /// Path to the document (.docx, .doc, or a .json document model)
    #[arg(short, long)]
    input: String,

    /// Text file with one required phrase per line
    #[arg(short, long)]
    phrases: Option<String>,

    /// Required phrase (repeatable)
    #[arg(long = "phrase")]
    phrase: Vec<String>,

    /// Path to check config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Match phrases with exact casing
    #[arg(long)]
    case_sensitive: bool,

    /// Only match phrases on word boundaries
    #[arg(long)]
    whole_word: bool,

    /// Skip header and footer paragraphs
    #[arg(long)]
    no_headers_footers: bool,

    /// Suggest near-miss spellings for missing single-word phrases
    #[arg(long)]
    spellcheck: bool,

    /// Edit distance cap for --spellcheck (clamped to 1..=3)
    #[arg(long)]
    spell_max_distance: Option<usize>,

    /// Enforce "dự toán mua sắm: mua sắm"
    #[arg(long)]
    check_format_rule: bool,

    /// Output format: report or summary
    #[arg(short = 'f', long, default_value = "report")]
    output_format: String,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Path to the LibreOffice binary used for .doc input
    #[arg(long)]
    soffice_path: Option<String>,

    /// Enable timing of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    println!("🦀 Wordcheck Document Checker");

    if !OUTPUT_FORMATS.contains(&args.output_format.as_str()) {
        bail!(
            "unknown output format '{}' (expected one of: {})",
            args.output_format,
            OUTPUT_FORMATS.join(", ")
        );
    }

    if !Path::new(&args.input).exists() {
        bail!("input document not found: {}", args.input);
    }

    let config = build_config(&args)?;
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    }
    println!("📋 {} phrase(s) to check", config.normalized().phrases.len());

    let (bytes, file_name) = load_input(&args)?;
    let checker = DocumentChecker::new();

    println!("📄 Processing: {}", args.input);

    if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let stages = checker.check_bytes_capture_stages(&bytes, &file_name, &config)?;
        save_stages(&stages, &args.input, &args.stages_dir)?;
        println!("\n✅ All stages dumped to: {}", args.stages_dir);
        return Ok(());
    }

    let mut profiler = StepProfiler::new(args.profile);
    let report = match checker.check_bytes_with_profiler(&bytes, &file_name, &config, &mut profiler) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Check failed: {e:#}");
            std::process::exit(1);
        }
    };
    if args.profile {
        print!("\n{}", profiler.summary());
    }

    print_report_summary(&report);

    let output_path = args.output.clone().unwrap_or_else(|| {
        let input_name = Path::new(&args.input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        format!("{input_name}_wordcheck.json")
    });
    report.save_with_format(&output_path, &args.output_format)?;
    println!("💾 {} results saved to: {}", args.output_format, output_path);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wordcheck=info,wordcheck_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults), then phrase sources, then flag overrides
fn build_config(args: &Args) -> Result<CheckConfig> {
    let mut config = match &args.config {
        Some(path) => CheckConfig::load_from_file(path).with_context(|| format!("failed to load config {path}"))?,
        None => CheckConfig::default(),
    };

    if let Some(path) = &args.phrases {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read phrase file {path}"))?;
        config = config.with_phrase_lines(&text);
    }
    config.phrases.extend(args.phrase.iter().cloned());

    if args.case_sensitive {
        config.case_sensitive = true;
    }
    if args.whole_word {
        config.whole_word = true;
    }
    if args.no_headers_footers {
        config.scan_headers_footers = false;
    }
    if args.spellcheck {
        config.spellcheck_vi = true;
    }
    if let Some(distance) = args.spell_max_distance {
        config.spell_max_distance = distance;
    }
    if args.check_format_rule {
        config.check_format_rule = true;
    }

    config.validate()?;
    Ok(config)
}

/// Input bytes plus the file name the core should dispatch on. Legacy
/// `.doc` files are converted to DOCX first.
fn load_input(args: &Args) -> Result<(Vec<u8>, String)> {
    let path = Path::new(&args.input);
    let is_legacy = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("doc"));

    if !is_legacy {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", args.input))?;
        return Ok((bytes, args.input.clone()));
    }

    println!("🔄 Converting legacy .doc with LibreOffice");
    let converter = SofficeConverter::locate(args.soffice_path.as_deref())?;
    println!("🔧 Using: {}", converter.program().display());
    let bytes = converter.convert_file(path)?;
    Ok((bytes, path.with_extension("docx").display().to_string()))
}

fn print_report_summary(report: &Report) {
    let stats = &report.stats;
    println!("✅ Check complete");
    if report.is_clean() {
        println!("🎉 All phrases found, no alerts");
        return;
    }
    println!("📊 Phrases: {} total, {} found, {} missing", stats.phrases_total, stats.found, stats.missing);
    for phrase in &report.missing {
        println!("   - missing: {phrase}");
    }
    if stats.typo_suspects_phrases > 0 {
        println!("   - {} missing phrase(s) have typo suspects", stats.typo_suspects_phrases);
    }
    println!(
        "⚠️  Alerts: {} misspellings, {} rule violations, {} capitalization",
        stats.misspellings_total, stats.rule_violations_total, stats.capitalization_total
    );
}

fn save_stages(stages: &CheckStages, input: &str, output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    // Stage 1: Extracted document model
    let doc_path = format!("{}/stage1_document.json", output_dir);
    fs::write(&doc_path, serde_json::to_string_pretty(&stages.document)?)?;
    println!("  💾 {} ({} paragraphs)", doc_path, stages.document.paragraph_count());

    // Stage 2: Tagged blocks
    let blocks_path = format!("{}/stage2_blocks.json", output_dir);
    fs::write(&blocks_path, serde_json::to_string_pretty(&stages.blocks)?)?;
    println!("  💾 {} ({} blocks)", blocks_path, stages.blocks.len());

    // Stage 3: Final report
    let report_path = format!("{}/stage3_report.json", output_dir);
    stages.report.save_with_format(&report_path, "report")?;
    println!("  💾 {}", report_path);

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": input,
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "paragraphs": stages.document.paragraph_count(),
            "blocks": stages.blocks.len(),
            "found": stages.report.stats.found,
            "missing": stages.report.stats.missing,
        }
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}
