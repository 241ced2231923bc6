//! Command-line interface for countersheet
//!
//! Usage:
//!   countersheet layout `<data>` --template `<file>` [options]   - Parse and lay out, print the plan
//!   countersheet parse `<data>` [--template `<file>`] [options]  - Print the parsed counters

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use countersheet::config::{CounterSheetConfig, ExportConfig, Loader, OutputConfig, OutputFormat};
use countersheet::error::{Error, Result};
use countersheet::layout::{GeometryRenderer, LayoutPlan};
use countersheet::{datafile, parse_rows, Template};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level().as_str().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn cli() -> Command {
    let data = Arg::new("data")
        .help("Counter definition file (CSV, semicolon or tab separated)")
        .required(true)
        .index(1);
    let template = Arg::new("template")
        .long("template")
        .short('t')
        .help("Template catalog (JSON)")
        .value_parser(value_parser!(PathBuf));
    let config = Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults")
        .value_parser(value_parser!(PathBuf));
    let format = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["json", "yaml"]);

    Command::new("countersheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds game counters from a definition file and tiles them onto sheets")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("layout")
                .about("Parse the definition, lay the counters out and print the plan")
                .arg(data.clone())
                .arg(template.clone().required(true))
                .arg(
                    Arg::new("geometry")
                        .long("geometry")
                        .short('g')
                        .help("Part geometry as printed by `inkscape --query-all`")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(config.clone())
                .arg(format.clone())
                .arg(
                    Arg::new("one-sided")
                        .long("one-sided")
                        .help("Place backs on the front sheets")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("registration-marks")
                        .long("registration-marks")
                        .help("Registration mark length")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("spacing")
                        .long("spacing")
                        .help("Gap between counters")
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse the definition and print the counters")
                .arg(data)
                .arg(template)
                .arg(config)
                .arg(format),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("layout", sub)) => handle_layout_command(sub),
        Some(("parse", sub)) => handle_parse_command(sub),
        _ => unreachable!("a subcommand is required"),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn load_template(path: Option<&PathBuf>) -> Result<Template> {
    match path {
        Some(path) => Ok(Template::from_path(path)?),
        None => Ok(Template::default()),
    }
}

fn read_definition(sub: &ArgMatches) -> Result<Vec<Vec<String>>> {
    let name = sub
        .get_one::<String>("data")
        .expect("data is a required argument");
    let path = datafile::locate(name, home_dir().as_deref())?;
    datafile::read_rows(&path)
}

/// Defaults layered with `--config` and `--format`.
fn config_loader(sub: &ArgMatches) -> Result<Loader> {
    let mut loader = Loader::new();
    if let Some(path) = sub.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = sub.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    Ok(loader)
}

fn load_layout_config(sub: &ArgMatches) -> Result<CounterSheetConfig> {
    let mut loader = config_loader(sub)?;
    if sub.get_flag("one-sided") {
        loader = loader.set_override("layout.one_sided", true)?;
    }
    if let Some(len) = sub.get_one::<f64>("registration-marks") {
        loader = loader.set_override("layout.registration_marks_len", *len)?;
    }
    if let Some(spacing) = sub.get_one::<f64>("spacing") {
        loader = loader.set_override("layout.spacing", *spacing)?;
    }
    Ok(loader.build()?)
}

fn merge_geometry(template: &mut Template, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let merged = template.merge_query_all_source(&source);
    log::info!("merged geometry of {} elements", merged);
    Ok(())
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    #[serde(flatten)]
    plan: &'a LayoutPlan,
    export: &'a ExportConfig,
}

/// Handle the layout command
fn handle_layout_command(sub: &ArgMatches) -> Result<()> {
    let config = load_layout_config(sub)?;
    let mut template = load_template(sub.get_one::<PathBuf>("template"))?;
    if let Some(path) = sub.get_one::<PathBuf>("geometry") {
        merge_geometry(&mut template, path)?;
    }
    let rows = read_definition(sub)?;
    let mut parsed = parse_rows(&rows, &template)?;

    let settings = config.layout.settings(template.width);
    let boxes = template.boxes(settings.registration_marks_len);
    let mut renderer = GeometryRenderer::new(&template);
    let plan = countersheet::lay_out(&mut parsed.counters, &boxes, &settings, &mut renderer)?;

    let output = LayoutOutput {
        plan: &plan,
        export: &config.export,
    };
    print_output(&output, &config.output)
}

/// Handle the parse command
fn handle_parse_command(sub: &ArgMatches) -> Result<()> {
    let template = load_template(sub.get_one::<PathBuf>("template"))?;
    let rows = read_definition(sub)?;
    let parsed = parse_rows(&rows, &template)?;
    let config = config_loader(sub)?.build()?;
    print_output(&parsed, &config.output)
}

fn print_output<T: Serialize>(value: &T, output: &OutputConfig) -> Result<()> {
    let text = match (output.format, output.pretty) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(value)? + "\n",
        (OutputFormat::Json, false) => serde_json::to_string(value)? + "\n",
        (OutputFormat::Yaml, _) => serde_yaml::to_string(value)?,
    };
    print!("{}", text);
    Ok(())
}
