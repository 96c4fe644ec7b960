use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use lang_core::model::{ActivitySettings, ActivitySettingsDraft, MiniGameKind};
use lang_core::{Locale, LocaleSetting};
use services::{
    ActivityConfig, ActivityController, ActivityView, MiniGame, MiniGameDispatch, Shuffler,
    ViewSink,
};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_FILTER: &str = "app=info,services=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLocale { raw: String },
    InvalidSeed { raw: String },
    InvalidDataDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLocale { raw } => write!(f, "invalid --locale value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDataDir { raw } => write!(f, "invalid --data value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    data_dir: PathBuf,
    locale: Option<LocaleSetting>,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--data <dir>] [--locale <locale|system>] [--config <file.json>] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data {DEFAULT_DATA_DIR}");
    eprintln!("  --locale taken from the config file, else system");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LANG_ACTIVITY_DATA, LANG_ACTIVITY_LOCALE, LC_ALL, LANG, RUST_LOG");
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        data_env: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut data_dir = data_env
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let mut locale = None;
        let mut config = None;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataDir { raw: value });
                    }
                    data_dir = PathBuf::from(value);
                }
                "--locale" => {
                    let value = require_value(args, "--locale")?;
                    let parsed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLocale { raw: value.clone() })?;
                    locale = Some(parsed);
                }
                "--config" => {
                    config = Some(PathBuf::from(require_value(args, "--config")?));
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_dir,
            locale,
            config,
            seed,
        })
    }
}

/// First parseable locale among the activity override and the POSIX variables.
fn system_locale() -> Option<Locale> {
    ["LANG_ACTIVITY_LOCALE", "LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|raw| raw.parse().ok())
}

fn load_settings(args: &Args) -> Result<ActivitySettings, Box<dyn std::error::Error>> {
    let draft = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<ActivitySettingsDraft>(&raw)?
        }
        None => ActivitySettingsDraft::new(),
    };
    let settings = draft.validate()?;
    Ok(match &args.locale {
        Some(locale) => settings.with_locale(locale.clone()),
        None => settings,
    })
}

// ─── Console host ──────────────────────────────────────────────────────────────

/// Prints every view; word images are shown relative to the data directory.
struct ConsoleSink {
    asset_root: PathBuf,
}

impl ViewSink for ConsoleSink {
    fn show(&mut self, view: ActivityView) {
        match view {
            ActivityView::Menu(menu) => {
                println!();
                println!("=== Lessons ({}) ===", menu.locale);
                if menu.fallback {
                    println!("(no lessons in your language yet; showing the default language)");
                }
                for entry in &menu.entries {
                    println!(
                        "  [{}] {:<20} {}/{}",
                        entry.item.index, entry.item.label, entry.best_saved, entry.item.word_count
                    );
                }
            }
            ActivityView::SubItem(item) => {
                println!();
                println!(
                    "{} - {}/{}{}",
                    item.lesson_name,
                    item.sub_item,
                    item.total,
                    if item.previous_enabled { "" } else { " (first)" }
                );
                println!(
                    "  {}  [{}]",
                    item.word.text(),
                    item.word.image().resolved_against(&self.asset_root)
                );
            }
            ActivityView::MiniGame(game) => {
                println!();
                println!(
                    "--- {} round {} (stage {}, {} words, view {}) ---",
                    game.kind,
                    game.mode,
                    game.stage + 1,
                    game.total,
                    game.view
                );
            }
            ActivityView::Stopped => println!("Activity stopped."),
        }
    }
}

/// Stand-in for a real mini-game: lists the round's words and waits for `win`.
struct ConsoleMiniGame;

impl MiniGame for ConsoleMiniGame {
    fn start(&mut self, _sink: &mut dyn ViewSink, dispatch: MiniGameDispatch) {
        let words: Vec<&str> = dispatch.words.iter().map(|word| word.text()).collect();
        println!("  words: {}", words.join(", "));
        println!("  type `win` when the round is done");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Lesson(isize),
    Next,
    Previous,
    Forward,
    Back,
    Win,
    Menu,
    Locale(LocaleSetting),
    Status,
    Help,
    Quit,
}

impl ReplCommand {
    fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let head = parts.next()?;
        let arg = parts.next();
        match (head, arg) {
            ("lesson" | "l", Some(raw)) => raw.parse().ok().map(Self::Lesson),
            ("locale", Some(raw)) => raw.parse().ok().map(Self::Locale),
            ("next" | "n", None) => Some(Self::Next),
            ("prev" | "p", None) => Some(Self::Previous),
            ("fwd" | "f", None) => Some(Self::Forward),
            ("back" | "b", None) => Some(Self::Back),
            ("win" | "w", None) => Some(Self::Win),
            ("menu" | "m", None) => Some(Self::Menu),
            ("status" | "s", None) => Some(Self::Status),
            ("help" | "h" | "?", None) => Some(Self::Help),
            ("quit" | "q", None) => Some(Self::Quit),
            _ => None,
        }
    }
}

fn print_commands() {
    println!("Commands:");
    println!("  lesson <n> / l <n> - Enter lesson n");
    println!("  fwd / f            - Next word");
    println!("  back / b           - Previous word");
    println!("  next / n           - Next lesson");
    println!("  prev / p           - Previous lesson");
    println!("  win / w            - Finish the current mini-game round");
    println!("  menu / m           - Back to the lesson list");
    println!("  locale <loc>       - Switch language (e.g. fr, pt_BR, system)");
    println!("  status / s         - Show saved progress");
    println!("  quit / q           - Exit");
}

fn dispatch(
    controller: &mut ActivityController,
    command: ReplCommand,
) -> Result<bool, services::ActivityError> {
    match command {
        ReplCommand::Lesson(index) => controller.enter_lesson(index)?,
        ReplCommand::Next => controller.next_lesson()?,
        ReplCommand::Previous => controller.previous_lesson()?,
        ReplCommand::Forward => {
            controller.advance_sub_item()?;
        }
        ReplCommand::Back => {
            controller.retreat_sub_item()?;
        }
        ReplCommand::Win => controller.mini_game_won()?,
        ReplCommand::Menu => controller.return_to_menu()?,
        ReplCommand::Locale(locale) => controller.set_locale(locale)?,
        ReplCommand::Status => {
            for (lesson, best) in controller.progress().snapshot() {
                println!("  lesson {lesson}: {best}");
            }
        }
        ReplCommand::Help => print_commands(),
        ReplCommand::Quit => {
            controller.stop();
            return Ok(false);
        }
    }
    Ok(true)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    if matches!(std::env::args().nth(1).as_deref(), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let args = Args::parse(&mut argv, std::env::var("LANG_ACTIVITY_DATA").ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let settings = load_settings(&args)?;
    let shuffler = args.seed.map_or_else(Shuffler::random, Shuffler::seeded);

    tracing::info!(data = %args.data_dir.display(), locale = %settings.locale(), "starting activity");

    let storage = Storage::filesystem(args.data_dir.clone());
    let sink = ConsoleSink {
        asset_root: args.data_dir.clone(),
    };
    let config = ActivityConfig::new(settings, &storage, Box::new(sink))
        .with_shuffler(shuffler)
        .with_system_locale(system_locale())
        .with_mini_game(MiniGameKind::Quiz, Box::new(ConsoleMiniGame))
        .with_mini_game(MiniGameKind::Spelling, Box::new(ConsoleMiniGame));
    let mut controller = ActivityController::init(config);
    controller.start()?;
    print_commands();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            controller.stop();
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let Some(command) = ReplCommand::parse(input) else {
            println!("Unknown command: {input} (try `help`)");
            continue;
        };
        match dispatch(&mut controller, command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], data_env: Option<&str>) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter, data_env.map(str::to_string))
    }

    #[test]
    fn defaults_without_arguments() {
        let args = parse(&[], None).unwrap();
        assert_eq!(args.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(args.locale, None);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--data", "/srv/words", "--locale", "pt-BR", "--seed", "9"],
            Some("/env/words"),
        )
        .unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/srv/words"));
        assert_eq!(
            args.locale,
            Some(LocaleSetting::Explicit("pt_BR".parse().unwrap()))
        );
        assert_eq!(args.seed, Some(9));

        let args = parse(&[], Some("/env/words")).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/env/words"));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(matches!(
            parse(&["--seed", "many"], None),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--locale"], None),
            Err(ArgsError::MissingValue { flag: "--locale" })
        ));
        assert!(matches!(
            parse(&["--verbose"], None),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn repl_commands_parse() {
        assert_eq!(ReplCommand::parse("lesson -1"), Some(ReplCommand::Lesson(-1)));
        assert_eq!(ReplCommand::parse("f"), Some(ReplCommand::Forward));
        assert_eq!(
            ReplCommand::parse("locale system"),
            Some(ReplCommand::Locale(LocaleSetting::System))
        );
        assert_eq!(ReplCommand::parse("next 2"), None);
        assert_eq!(ReplCommand::parse("dance"), None);
    }
}
