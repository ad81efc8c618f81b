use clap::{Parser, Subcommand};
use clipgrid_pipeline::grouping::ClipGroups;
use clipgrid_pipeline::{collect_groups, run_pipeline, ConfigError, GroupOrder, PageConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Video comparison page generator", version)]
struct Args {
    /// Log pipeline progress (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan videos, read captions and write the HTML page.
    Render(RenderArgs),
    /// Write the built-in configuration as TOML.
    InitConfig(InitConfigArgs),
    /// Print the groups found in the input directory and their table.
    Scan(ScanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    input_dir: Option<PathBuf>,
    #[arg(long)]
    captions: Option<PathBuf>,
    #[arg(long)]
    out: Option<PathBuf>,
    /// Reserve this many trailing caption cells in the second table for the
    /// filler text.
    #[arg(long)]
    split_nc_count: Option<usize>,
    /// Keep directory listing order instead of sorting groups.
    #[arg(long)]
    scan_order: bool,
}

#[derive(Parser, Debug)]
struct InitConfigArgs {
    #[arg(long)]
    out: PathBuf,
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct ScanArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Render(render) => {
            let mut config = match load_config(render.config.as_deref()) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("Config error: {err}");
                    std::process::exit(1);
                }
            };
            if let Some(input_dir) = render.input_dir {
                config.input_dir = input_dir;
            }
            if let Some(captions) = render.captions {
                config.caption_file = captions;
            }
            if let Some(out) = render.out {
                config.output_file = out;
            }
            if render.split_nc_count.is_some() {
                config.split_nc_count = render.split_nc_count;
            }
            if render.scan_order {
                config.group_order = GroupOrder::Scan;
            }

            match run_pipeline(&config) {
                Ok(report) => {
                    println!(
                        "HTML with two tables generated and saved as {}",
                        report.output_file.display()
                    );
                    println!(
                        "Rows: {} baseline, {} ablation ({} captioned)",
                        report.first_table_rows,
                        report.second_table_rows,
                        report.groups_captioned
                    );
                }
                Err(err) => {
                    eprintln!("Render error: {err}");
                    std::process::exit(1);
                }
            }
        }
        Command::InitConfig(init) => {
            if init.out.exists() && !init.force {
                eprintln!(
                    "Init error: {} already exists (pass --force to overwrite)",
                    init.out.display()
                );
                std::process::exit(1);
            }
            let written = PageConfig::default()
                .to_toml()
                .map_err(|err| err.to_string())
                .and_then(|toml_src| {
                    std::fs::write(&init.out, toml_src)
                        .map_err(|err| format!("write {}: {err}", init.out.display()))
                });
            match written {
                Ok(()) => println!("Wrote default config to {}", init.out.display()),
                Err(err) => {
                    eprintln!("Init error: {err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Scan(scan) => {
            let mut config = match load_config(scan.config.as_deref()) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("Config error: {err}");
                    std::process::exit(1);
                }
            };
            if let Some(input_dir) = scan.input_dir {
                config.input_dir = input_dir;
            }
            match collect_groups(&config) {
                Ok(grouped) => {
                    println!(
                        "Scanned {} entries: {} videos matched, {} skipped",
                        grouped.entries_scanned, grouped.videos_matched, grouped.entries_skipped
                    );
                    print_groups("table 1", &grouped.partition.first);
                    print_groups("table 2", &grouped.partition.second);
                }
                Err(err) => {
                    eprintln!("Scan error: {err}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig, ConfigError> {
    match path {
        Some(path) => PageConfig::load(path),
        None => Ok(PageConfig::default()),
    }
}

fn print_groups(label: &str, groups: &ClipGroups) {
    for group in groups.iter() {
        let suffixes = group
            .variants
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("[{label}] {}: {suffixes}", group.key);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
