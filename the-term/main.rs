//! Proof-of-life terminal host for the-lib's editor core.
//!
//! Owns the event loop: crossterm events are translated into the core's
//! input events, handed to `Editor::handle_event`, and the resulting render
//! plan is drawn with ratatui. Ctrl+Q quits.

mod input;
mod render;
mod terminal;
mod theme;

use std::{
  fs::File,
  io::BufReader,
  path::{
    Path,
    PathBuf,
  },
  time::Duration,
};

use clap::Parser;
use crossterm::event::{
  self,
  Event,
};
use eyre::{
  Result,
  WrapErr,
};
use ropey::Rope;
use the_lib::{
  config::Config,
  editor::Editor,
  input::InputEvent,
};

use crate::terminal::Terminal;

#[derive(Debug, Parser)]
#[command(name = "the-surface")]
#[command(about = "Terminal host for the-lib's C++ editing core")]
struct Cli {
  /// Path to a TOML config file
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Log file (defaults to the-surface.log in the temp dir)
  #[arg(long)]
  log: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Path to file to open
  file: Option<PathBuf>,
}

fn setup_logging(path: &Path, verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level)
    .chain(fern::log_file(path).wrap_err_with(|| format!("opening log file {}", path.display()))?)
    .apply()?;
  Ok(())
}

fn open_editor(config: &Config, file: Option<&Path>) -> Result<Editor> {
  let Some(path) = file else {
    return Ok(Editor::new(config)?);
  };

  let reader = File::open(path)
    .map(BufReader::new)
    .wrap_err_with(|| format!("opening {}", path.display()))?;
  let text = Rope::from_reader(reader).wrap_err_with(|| format!("reading {}", path.display()))?;
  let mut editor = Editor::with_text(config, text)?;
  if let Some(name) = path.file_name() {
    editor.set_display_name(&name.to_string_lossy());
  }
  Ok(editor)
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let log_path = cli
    .log
    .clone()
    .unwrap_or_else(|| std::env::temp_dir().join("the-surface.log"));
  setup_logging(&log_path, cli.verbose)?;

  let config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::default(),
  };
  let mut editor = open_editor(&config, cli.file.as_deref())?;
  log::info!("starting with font size {}", editor.view().font_size());

  let mut terminal = Terminal::new()?;
  terminal.enter_raw_mode()?;
  let result = run(&mut editor, &mut terminal);
  terminal.leave_raw_mode()?;
  result
}

fn run(editor: &mut Editor, terminal: &mut Terminal) -> Result<()> {
  let mut needs_render = true;

  loop {
    if needs_render {
      let (text_area, _) = render::split_status(terminal.size()?);
      render::ensure_cursor_visible(editor, usize::from(text_area.height));
      terminal.draw(|frame| render::render(editor, frame))?;
      needs_render = false;
    }

    if !event::poll(Duration::from_millis(100))? {
      continue;
    }

    let event = event::read()?;
    if input::is_quit(&event) {
      break;
    }
    if let Event::Resize(width, height) = event {
      terminal.resize(width, height)?;
      needs_render = true;
      continue;
    }

    let Some(input) = input::to_input_event(event) else {
      continue;
    };
    let wheel = match &input {
      InputEvent::Scroll(scroll) => Some(scroll.delta),
      _ => None,
    };

    match editor.handle_event(input) {
      Ok(result) if !result.is_consumed() => {
        if let Some(delta) = wheel {
          render::scroll_view(editor, delta);
          terminal.draw(|frame| render::render(editor, frame))?;
        }
      },
      Ok(_) => {},
      Err(err) => log::warn!("event failed: {err}"),
    }

    if editor.take_redraw() {
      needs_render = true;
    }
  }

  Ok(())
}
