use std::env;
use std::fs;
use std::path::PathBuf;

use didit_core::config::Config;
use didit_core::options::list_options;
use didit_core::persistence::FileStore;
use didit_core::selection::select_action;
use didit_core::selection::SlotSelection;
use didit_core::IncrementTarget;
use didit_core::KeyValueStore;
use didit_host::adapters::resolve_surface;
use didit_host::adapters::ActionListSurface;
use didit_host::adapters::ControlSurface;
use didit_host::adapters::HomeScreenSurface;
use didit_host::adapters::SingleActionSurface;
use didit_host::adapters::WidgetSurface;
use didit_host::contracts::TapRequest;
use didit_host::executor::DryRunTapExecutor;
use didit_host::executor::StoreTapExecutor;
use didit_host::executor::TapExecutor;
use didit_host::reload::LoggingReload;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct GlobalArgs {
    store: Option<PathBuf>,
    app_state: Option<PathBuf>,
    config: Option<PathBuf>,
    dry_run: bool,
    command: Vec<String>,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_global_args(env::args().skip(1).collect())?;
    let Some(command) = args.command.first().cloned() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("didit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "resolve" | "tap" | "options" | "select" => {
            let config = load_config(args.config.clone())?;
            init_tracing(&config.log.filter);
            let store = FileStore::open(store_path(args.store.clone(), &config)?)?;
            tracing::debug!(store = %store.path().display(), command = %command, "store opened");
            let app_state = match args.app_state.clone().or(config.store.app_state_path.clone()) {
                Some(path) => Some(FileStore::open(path)?),
                None => None,
            };
            let rest = &args.command[1..];
            match command.as_str() {
                "resolve" => run_resolve(&store, &config, rest),
                "tap" => run_tap(&store, app_state.as_ref(), rest, args.dry_run),
                "options" => print_json(&list_options(&store, &config.widget)),
                _ => run_select(&store, rest),
            }
        }
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

fn parse_global_args(args: Vec<String>) -> Result<GlobalArgs, Box<dyn std::error::Error>> {
    let mut parsed = GlobalArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--store" | "--app-state" | "--config") => {
                let Some(value) = args.get(i + 1) else {
                    return Err(format!("{flag} requires a path").into());
                };
                let value = Some(PathBuf::from(value));
                match flag {
                    "--store" => parsed.store = value,
                    "--app-state" => parsed.app_state = value,
                    _ => parsed.config = value,
                }
                i += 2;
            }
            "--dry-run" => {
                parsed.dry_run = true;
                i += 1;
            }
            other => {
                parsed.command.push(other.to_string());
                i += 1;
            }
        }
    }
    Ok(parsed)
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(path) => path,
        None => match dirs::config_dir().map(|dir| dir.join("didit").join("config.toml")) {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("read config {}: {err}", path.display()))?;
    let config = toml::from_str::<Config>(&contents)
        .map_err(|err| format!("parse config {}: {err}", path.display()))?;
    Ok(config)
}

fn store_path(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = flag.or_else(|| config.store.path.clone()) {
        return Ok(path);
    }
    let Some(data_dir) = dirs::data_dir() else {
        return Err("no data directory; pass --store PATH".into());
    };
    Ok(data_dir.join("didit").join("widget.json"))
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_resolve(
    store: &dyn KeyValueStore,
    config: &Config,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let surface = surface_for(config, args)?;
    let mut resolution = resolve_surface(surface.as_ref(), store, &config.widget);
    if let Ok(locale) = env::var("LANG") {
        resolution.language = didit_core::locale::resolve_language(store, Some(&locale));
    }
    print_json(&ResolveOutput {
        surface: surface.name(),
        placeholder: resolution.placeholder().map(|placeholder| placeholder.label()),
        resolution: &resolution,
    })
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    surface: &'static str,
    placeholder: Option<&'static str>,
    #[serde(flatten)]
    resolution: &'a didit_core::Resolution,
}

fn surface_for(
    config: &Config,
    args: &[String],
) -> Result<Box<dyn WidgetSurface>, Box<dyn std::error::Error>> {
    let kind = args.first().map(String::as_str).unwrap_or("all");
    let target = || -> Result<String, Box<dyn std::error::Error>> {
        args.get(1)
            .cloned()
            .ok_or_else(|| format!("resolve {kind} requires an argument").into())
    };
    let surface: Box<dyn WidgetSurface> = match kind {
        "all" => Box::new(ActionListSurface),
        "id" => Box::new(ControlSurface {
            slot: "control".to_string(),
            configured: Some(target()?),
        }),
        "slot" => Box::new(SingleActionSurface { instance: target()? }),
        "home" => Box::new(HomeScreenSurface::new(target()?, &config.widget)),
        other => return Err(format!("unknown resolve target: {other}").into()),
    };
    Ok(surface)
}

fn run_tap(
    store: &FileStore,
    app_state: Option<&FileStore>,
    args: &[String],
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(raw) = args.first() else {
        return Err("tap requires an action id or didit:// link".into());
    };
    let request = if raw.contains("://") {
        TapRequest::parse(raw)?
    } else {
        TapRequest::new(raw.trim())
    };
    if request.action_id.is_empty() {
        return Err("tap requires a non-empty action id".into());
    }

    let result = if dry_run {
        DryRunTapExecutor::new(store).execute(&request)
    } else {
        let mut target = IncrementTarget::shared(store);
        if let Some(app_state) = app_state {
            target = target.with_app_state(app_state);
        }
        let reload = LoggingReload { surface: "all" };
        StoreTapExecutor::new(target, &reload).execute(&request)
    };
    print_json(&result)
}

fn run_select(store: &dyn KeyValueStore, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(slot), Some(choice)) = (args.first(), args.get(1)) else {
        return Err("select requires SLOT and ID|none|unset".into());
    };
    let selection = match choice.as_str() {
        "unset" => SlotSelection::Unset,
        other => SlotSelection::parse(Some(other)),
    };
    select_action(store, slot, &selection)?;
    print_json(&selection)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_help() {
    println!("didit {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  didit [--store PATH] [--app-state PATH] [--config PATH] <command>");
    println!("  didit resolve all|id ID|slot SLOT|home INSTANCE");
    println!("  didit tap ID|didit://increment?id=ID [--dry-run]");
    println!("  didit options");
    println!("  didit select SLOT ID|none|unset");
    println!("  didit --help");
    println!("  didit --version");
}
