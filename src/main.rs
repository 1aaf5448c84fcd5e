mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use face_shooter::config::{GameConfig, Viewport};
use face_shooter::control::FaceLandmarks;
use face_shooter::media::MediaContext;
use face_shooter::session::GameSession;

use display::Screen;

const FRAME: Duration = Duration::from_millis(33); // ≈30 detector callbacks/sec

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

const SENSITIVITY_STEP: f32 = 0.25;

#[derive(Parser, Debug)]
#[command(name = "face_shooter", about = "Arcade shooter steered by head position, fired by opening your mouth")]
struct Args {
    /// JSON file overriding game tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON sprite sheet for the terminal renderer
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Aim gain around the frame centre
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Run a scripted face for `--frames` ticks and print the final snapshot as JSON
    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 1800)]
    frames: u64,

    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,

    /// Headless viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Headless viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Write logs here (interactive mode owns stdout, so logs are off without it)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn invalid_input(err: face_shooter::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Where the nose has to be for the aim to land on normalized playfield
/// position `(px, py)`: undo the mirror and the sensitivity gain.
fn nose_for_pointer(px: f32, py: f32, sensitivity: f32) -> (f32, f32) {
    let cx = 1.0 - px;
    (0.5 + (cx - 0.5) / sensitivity, 0.5 + (py - 0.5) / sensitivity)
}

// ── Headless driver ───────────────────────────────────────────────────────────

fn run_headless(args: &Args, config: GameConfig, rng: StdRng) -> std::io::Result<()> {
    let mut session = GameSession::new(config, Viewport::new(args.width, args.height), rng)
        .map_err(invalid_input)?;
    if let Some(s) = args.sensitivity {
        session.set_sensitivity(s);
    }

    for frame in 0..args.frames {
        // Sweep side to side near the bottom, blinking the mouth open.
        let px = 0.5 + 0.4 * (frame as f32 * 0.05).sin();
        let nose = nose_for_pointer(px, 0.85, session.sensitivity());
        let face = FaceLandmarks::synthetic(nose, frame % 20 < 3);
        session.on_detector_frame(Some(&face));
    }

    let snap = session.snapshot();
    info!(
        frames = args.frames,
        score = snap.score,
        level = snap.level,
        lives = snap.lives,
        status = ?snap.status,
        "headless run finished"
    );
    let json = serde_json::to_string_pretty(&snap)
        .map_err(|e| invalid_input(face_shooter::Error::from(e)))?;
    let mut out = stdout();
    writeln!(out, "{}", json)?;
    Ok(())
}

// ── Interactive loop ──────────────────────────────────────────────────────────

/// Input model: the mouse stands in for the nose, the left button or Space
/// for an open mouth, and `F` toggles whether a face is "in frame".
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession<StdRng>,
    media: &MediaContext,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut screen = Screen::new(cols, rows);
    session.set_viewport(screen.viewport());

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer = (0.5_f32, 0.85_f32);
    let mut mouse_down = false;
    let mut face_hidden = false;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char('f') | KeyCode::Char('F') => face_hidden = !face_hidden,
                            KeyCode::Char('r') | KeyCode::Char('R') => session.restart(),
                            KeyCode::Char('+') | KeyCode::Char('=') => {
                                session.set_sensitivity(session.sensitivity() + SENSITIVITY_STEP);
                            }
                            KeyCode::Char('-') => {
                                session.set_sensitivity(session.sensitivity() - SENSITIVITY_STEP);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    pointer = screen.normalize(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => mouse_down = true,
                        MouseEventKind::Up(MouseButton::Left) => mouse_down = false,
                        _ => {}
                    }
                }
                Event::Resize(c, r) => {
                    screen = Screen::new(c, r);
                    session.set_viewport(screen.viewport());
                }
                _ => {}
            }
        }

        // ── One synthetic detector callback per frame ─────────────────────────
        let mouth_open = mouse_down || is_held(&key_frame, &KeyCode::Char(' '), frame);
        let face = (!face_hidden).then(|| {
            let nose = nose_for_pointer(pointer.0, pointer.1, session.sensitivity());
            FaceLandmarks::synthetic(nose, mouth_open)
        });
        session.on_detector_frame(face.as_ref());

        display::render(out, &session.snapshot(), media, &screen, session.sensitivity())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.headless)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path).map_err(invalid_input)?,
        None => GameConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if args.headless {
        return run_headless(&args, config, rng);
    }

    let mut media = MediaContext::new();
    if let Some(path) = &args.sprites {
        // Missing sprites are not fatal: the renderer falls back to plain glyphs.
        match media.load_sprites(path) {
            Ok(count) => info!(count, path = %path.display(), "sprite sheet loaded"),
            Err(err) => warn!(%err, path = %path.display(), "sprite sheet rejected, using fallbacks"),
        }
    }

    let (cols, rows) = terminal::size()?;
    let mut session = GameSession::new(config, Screen::new(cols, rows).viewport(), rng)
        .map_err(invalid_input)?;
    if let Some(s) = args.sensitivity {
        session.set_sensitivity(s);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicated thread for blocking event reads so the frame loop never blocks.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &media, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(
        score = session.state().progression.score,
        high_score = session.state().progression.high_score,
        "session ended"
    );
    result
}
