use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use audit_grade::audit::{check_document, expand_inputs, load_audit, AuditDocument};
use audit_grade::config::{self, Config, OutputFormat};
use audit_grade::report::{assemble_report, default_report_file_name, save_report, AuditReport};
use audit_grade::{output, scoring};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_SAVE: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_CHECK: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade one or more audits and print the full report
    Report {
        /// Audit files (JSON or YAML) or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output format (defaults to output.format from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Also write each report as JSON to the output directory
        #[arg(short, long)]
        save: bool,

        /// Directory for saved reports (overrides output.directory)
        #[arg(long, requires = "save")]
        out_dir: Option<PathBuf>,
    },
    /// Print the overall, department or section score of an audit
    Score {
        input: PathBuf,

        /// Score a single department (its NA flag is ignored)
        #[arg(long, conflicts_with = "section")]
        department: Option<String>,

        /// Score a single section
        #[arg(long)]
        section: Option<String>,
    },
    /// List the findings of an audit
    Findings {
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Report data-quality problems the grader silently falls back on
    Check { input: PathBuf },
}

#[derive(Parser, Debug)]
#[command(name = "audit-grade")]
#[command(about = "Grade completed inspections and extract findings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/audit-grade/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    audit_grade::logging::init(cli.verbose);
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Report {
            inputs,
            format,
            save,
            out_dir,
        } => run_report(&config, &inputs, format, save, out_dir),
        Commands::Score {
            input,
            department,
            section,
        } => run_score(&input, department.as_deref(), section.as_deref()),
        Commands::Findings { input, format } => run_findings(&config, &input, format),
        Commands::Check { input } => run_check(&input),
    };

    tracing::debug!(
        elapsed = %humantime::format_duration(start_time.elapsed()),
        "done"
    );
    std::process::exit(code);
}

fn load_or_report(path: &Path) -> Option<AuditDocument> {
    match load_audit(path) {
        Ok(doc) => {
            if let Err(problems) = check_document(&doc) {
                for problem in problems {
                    tracing::warn!(path = %path.display(), "{}", problem);
                }
            }
            Some(doc)
        }
        Err(e) => {
            eprintln!("{:#}", e);
            None
        }
    }
}

fn run_report(
    config: &Config,
    inputs: &[String],
    format: Option<OutputFormat>,
    save: bool,
    out_dir: Option<PathBuf>,
) -> i32 {
    let paths = match expand_inputs(inputs) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_INPUT;
        }
    };

    let format = format.unwrap_or_else(|| config.output.format());
    let save_dir = out_dir.unwrap_or_else(|| config::report_dir(config));
    let use_colors = output::should_use_colors();

    let mut reports: Vec<AuditReport> = Vec::new();
    let mut any_loaded = false;
    let mut save_failed = false;

    // Each audit is graded independently; one bad file does not stop the rest
    for path in &paths {
        let Some(doc) = load_or_report(path) else {
            continue;
        };
        any_loaded = true;

        let report = assemble_report(&doc);

        if save {
            let target = save_dir.join(default_report_file_name(&doc));
            let result = save_report(&target, &report, config.output.pretty());
            if result.success {
                eprintln!("Saved {}", target.display());
            } else {
                eprintln!(
                    "Failed to save report for {}: {}",
                    path.display(),
                    result.error.unwrap_or_default()
                );
                save_failed = true;
            }
        }

        reports.push(report);
    }

    match format {
        OutputFormat::Text => {
            let rendered: Vec<String> = reports
                .iter()
                .map(|r| output::format_report(r, use_colors))
                .collect();
            if !rendered.is_empty() {
                println!("{}", rendered.join("\n\n"));
            }
        }
        OutputFormat::Tsv => {
            for report in &reports {
                let tsv = output::format_report_tsv(report);
                if !tsv.is_empty() {
                    println!("{}", tsv);
                }
            }
        }
        OutputFormat::Json => {
            let json = if reports.len() == 1 {
                serde_json::to_string_pretty(&reports[0])
            } else {
                serde_json::to_string_pretty(&reports)
            };
            match json {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    eprintln!("Failed to serialize report: {}", e);
                    return EXIT_INPUT;
                }
            }
        }
    }

    if !any_loaded {
        EXIT_INPUT
    } else if save_failed {
        EXIT_SAVE
    } else {
        EXIT_SUCCESS
    }
}

fn run_score(input: &Path, department: Option<&str>, section: Option<&str>) -> i32 {
    let Some(doc) = load_or_report(input) else {
        return EXIT_INPUT;
    };

    let (label, result) = if let Some(name) = department {
        (name.to_string(), scoring::department_score(&doc, name))
    } else if let Some(name) = section {
        match doc.sections.iter().find(|s| s.name == name) {
            Some(s) => (name.to_string(), scoring::section_score(s)),
            None => {
                eprintln!("No section named '{}' in {}", name, input.display());
                return EXIT_INPUT;
            }
        }
    } else {
        let exclusions = scoring::resolve_exclusions(&doc.departments);
        ("Overall".to_string(), scoring::overall_score(&doc, &exclusions))
    };

    println!(
        "{}: {} ({})",
        label,
        output::format_score(result.percent),
        result.status
    );
    EXIT_SUCCESS
}

fn run_findings(config: &Config, input: &Path, format: Option<OutputFormat>) -> i32 {
    let Some(doc) = load_or_report(input) else {
        return EXIT_INPUT;
    };

    let report = assemble_report(&doc);
    match format.unwrap_or_else(|| config.output.format()) {
        OutputFormat::Text => println!(
            "{}",
            output::format_findings_table(&report.findings, output::should_use_colors())
        ),
        OutputFormat::Tsv => {
            let tsv = output::format_findings_tsv(&report.findings);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&report.findings) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize findings: {}", e);
                return EXIT_INPUT;
            }
        },
    }
    EXIT_SUCCESS
}

fn run_check(input: &Path) -> i32 {
    let doc = match load_audit(input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_INPUT;
        }
    };

    match check_document(&doc) {
        Ok(()) => {
            println!("{}: no problems found", input.display());
            EXIT_SUCCESS
        }
        Err(problems) => {
            println!("{}: {} problem(s)", input.display(), problems.len());
            for problem in problems {
                println!("  - {}", problem);
            }
            EXIT_CHECK
        }
    }
}
