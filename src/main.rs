use std::{
    cell::Cell,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use clap::Parser;
use crossterm::{
    cursor, event, queue,
    style::Print,
    terminal::{self, ClearType},
};
use log::info;
use playback::{
    animator::Animator,
    config::Options,
    error::Result,
    event::Control,
    screen::Screen,
    surface::{Canvas, Surface},
    timer::{Clock, ManualClock},
};

/// How long to wait for input when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Plays a sprite sheet in the terminal, or exports its frames as PNG files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Sprite sheet image. Overrides the config file.
    image: Option<PathBuf>,
    /// TOML file with playback options.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Block width in pixels.
    #[arg(short = 'w', long)]
    block_width: Option<u32>,
    /// Block height in pixels.
    #[arg(short = 'H', long)]
    block_height: Option<u32>,
    /// Milliseconds between frames.
    #[arg(short, long)]
    delay: Option<f64>,
    /// Comma separated cell indices to play instead of raster order.
    #[arg(short, long, value_delimiter = ',')]
    frames: Option<Vec<usize>>,
    /// Terminal pixels per sheet pixel.
    #[arg(short, long, default_value_t = 1)]
    zoom: u32,
    /// Write one PNG per frame of a single loop into this directory instead of playing.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        if let Some(image) = &self.image {
            options = options.image_path(image);
        }
        if let Some(width) = self.block_width {
            options.block_width = width;
        }
        if let Some(height) = self.block_height {
            options.block_height = height;
        }
        if let Some(delay) = self.delay {
            options.delay_ms = delay;
        }
        if let Some(frames) = &self.frames {
            options.frames = Some(frames.clone());
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = args.options()?;

    match &args.export {
        Some(dir) => export(options, dir),
        None => play(options, args.zoom),
    }
}

/// Steps through one loop on a manual clock, saving each drawn frame.
fn export(options: Options, dir: &Path) -> Result<()> {
    let clock = ManualClock::new();
    let mut animator = Animator::with_clock(options, Canvas::default(), clock.clone())?;
    let count = animator
        .frame_count()
        .unwrap_or_else(|| animator.cell_count());
    fs::create_dir_all(dir)?;

    animator.play();
    for i in 0..count {
        let path = dir.join(format!("frame_{i:04}.png"));
        animator.surface().save(&path)?;
        info!("wrote {} at {:?}", path.display(), animator.clock().now());
        clock.advance(animator.delay());
        animator.update();
    }
    animator.stop();
    Ok(())
}

fn play(options: Options, zoom: u32) -> Result<()> {
    let mut animator = Animator::new(options, Screen::new(zoom))?;
    animator.surface_mut().enter_screen()?;
    let result = run(&mut animator);
    let restored = animator.surface_mut().exit_screen();
    first_error(result, restored)
}

/// Keeps the error of the session over the one from restoring the terminal.
fn first_error(session: Result<()>, restored: io::Result<()>) -> Result<()> {
    session?;
    Ok(restored?)
}

fn run(animator: &mut Animator<Screen>) -> Result<()> {
    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    animator.on_draw(move |_| flag.set(true));
    animator.play();

    loop {
        animator.update();
        if dirty.replace(false) {
            animator.surface().render_screen()?;
            status(animator)?;
        }

        let timeout = animator.time_until_tick().unwrap_or(IDLE_POLL);
        if !event::poll(timeout)? {
            continue;
        }
        let Some(control) = Control::from_crossterm_event(event::read()?) else {
            continue;
        };
        match control {
            Control::Quit => return Ok(()),
            Control::TogglePlay if animator.is_playing() => animator.pause(),
            Control::TogglePlay => animator.play(),
            Control::Stop => {
                animator.stop();
                animator.refresh();
            }
            Control::StepForward => animator.step_forward(),
            Control::StepBackward => animator.step_backward(),
            Control::Faster => animator.set_delay(animator.delay_ms() / 2.0),
            Control::Slower => animator.set_delay(animator.delay_ms() * 2.0),
            Control::Refresh => animator.refresh(),
        }
        dirty.set(true);
    }
}

fn status(animator: &Animator<Screen>) -> io::Result<()> {
    let line = u16::try_from(animator.surface().cell_height()).unwrap_or(u16::MAX - 1);
    let position = match animator.current_frame() {
        Some(frame) => format!(
            "frame {}/{} (cell {})",
            frame + 1,
            animator.frame_count().unwrap_or(0),
            animator.displayed_cell()
        ),
        None => format!("cell {}/{}", animator.displayed_cell() + 1, animator.cell_count()),
    };
    let (width, height) = animator.surface().size();
    let mut out = io::stdout().lock();
    queue!(
        out,
        cursor::MoveTo(0, line.saturating_add(1)),
        terminal::Clear(ClearType::CurrentLine),
        Print(format!(
            "{:?}  {position}  {:.0} ms  {width}x{height}",
            animator.playback(),
            animator.delay_ms()
        )),
        cursor::MoveTo(0, line.saturating_add(2)),
        terminal::Clear(ClearType::CurrentLine),
        Print("[space] play/pause  [s] stop  [←/→] step  [+/-] speed  [q] quit"),
    )?;
    out.flush()
}
