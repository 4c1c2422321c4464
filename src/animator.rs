//! Module for playing back a [`SpriteSheet`] onto a [`Surface`].
//! Contains the [`Animator`] type and its public interface.
//!
//! An animator is driven from a host loop: call [`Animator::update`] whenever convenient
//! (the sooner after [`Animator::time_until_tick`] elapses, the smoother) and every tick
//! that came due since the last call is played, each one advancing the position by one
//! and redrawing.
//!
//! ```no_run
//! use playback::{animator::Animator, config::Options, surface::Canvas};
//!
//! # fn main() -> playback::error::Result<()> {
//! let options = Options::default()
//!     .image_path("walk.png")
//!     .block_size(32, 32)
//!     .delay_ms(100.0);
//! let mut animator = Animator::new(options, Canvas::default())?;
//! animator.on_draw(|event| println!("drew cell {}", event.cell));
//! animator.play();
//! loop {
//!     animator.update();
//!     # break;
//! }
//! # Ok(())
//! # }
//! ```
use std::time::Duration;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    config::{delay_from_ms, ImageSource, Options},
    error::{Error, Result},
    event::{DrawEvent, Observers},
    geometry::{wrap, BlockSize, Rect},
    sheet::SpriteSheet,
    surface::Surface,
    timer::{Clock, Interval, SystemClock},
};

/// Stack allocation size for frame sequences
const FRAMES_STACK_SIZE: usize = 16;

type Frames = SmallVec<[usize; FRAMES_STACK_SIZE]>;

/// Where playback currently is.
///
/// Without a frame sequence the animator walks every cell in raster order and the
/// position is a [`Position::Cell`]. With a sequence it walks the sequence and the
/// position is a [`Position::Frame`], an index into that sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Cell(usize),
    Frame(usize),
}

impl Position {
    /// The index within whichever counting mode is active.
    pub const fn index(self) -> usize {
        match self {
            Position::Cell(i) | Position::Frame(i) => i,
        }
    }

    /// The same counting mode at a different index.
    pub const fn with_index(self, index: usize) -> Self {
        match self {
            Position::Cell(_) => Position::Cell(index),
            Position::Frame(_) => Position::Frame(index),
        }
    }
}

/// Playback state. There is no terminal state: any state can be left again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Playback {
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Cycles through the blocks of a sprite sheet on a surface at a fixed interval.
pub struct Animator<S, C = SystemClock> {
    sheet: SpriteSheet,
    frames: Option<Frames>,
    position: Position,
    delay: Duration,
    playback: Playback,
    timer: Option<Interval>,
    surface: S,
    clock: C,
    observers: Observers,
}

impl<S: Surface> Animator<S> {
    /// Creates an animator running on wall clock time.
    ///
    /// See [`Animator::with_clock`].
    pub fn new(options: Options, surface: S) -> Result<Self> {
        Self::with_clock(options, surface, SystemClock::new())
    }
}

impl<S: Surface, C: Clock> Animator<S, C> {
    /// Creates an animator reading time from `clock`.
    ///
    /// The sheet is decoded (unless it was given as a handle), the surface is resized to
    /// exactly one block and the first position is drawn. The animator starts
    /// [`Playback::Stopped`].
    pub fn with_clock(options: Options, surface: S, clock: C) -> Result<Self> {
        let delay = options.delay();
        let block = options.block();
        let source = options.source.ok_or(Error::MissingImage)?;
        let sheet = SpriteSheet::from_source(&source, block)?;
        let frames = match options.frames {
            Some(frames) if !frames.is_empty() => {
                sheet.check_frames(&frames)?;
                Some(Frames::from_vec(frames))
            }
            _ => None,
        };
        let position = match frames {
            Some(_) => Position::Frame(0),
            None => Position::Cell(0),
        };

        let mut this = Self {
            sheet,
            frames,
            position,
            delay,
            playback: Playback::Stopped,
            timer: None,
            surface,
            clock,
            observers: Observers::new(),
        };
        this.fit_surface();
        this.redraw();
        Ok(this)
    }

    /// Registers an observer called after every draw. Observers cannot be removed.
    pub fn on_draw<F: FnMut(&DrawEvent) + 'static>(&mut self, observer: F) {
        self.observers.push(observer);
    }

    /// Time between two ticks.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// [`Animator::delay`] in fractional milliseconds.
    pub fn delay_ms(&self) -> f64 {
        self.delay.as_nanos() as f64 / 1_000_000.0
    }

    /// Changes the tick period. While playing, the schedule restarts from now with the new
    /// period, after playing any tick that was already due.
    pub fn set_delay(&mut self, ms: f64) {
        self.delay = delay_from_ms(ms);
        debug!("delay set to {:?}", self.delay);
        if self.playback == Playback::Playing {
            self.update();
            self.timer = Some(Interval::new(self.clock.now(), self.delay));
        }
    }

    /// The current position, tagged with the counting mode.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the animation is stopped, paused or playing.
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// `true` while a tick schedule is running.
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    /// Position within the frame sequence, `None` when playing in raster order.
    pub fn current_frame(&self) -> Option<usize> {
        match self.position {
            Position::Frame(frame) => Some(frame),
            Position::Cell(_) => None,
        }
    }

    /// Raster position, `None` when playing a frame sequence.
    pub fn current_cell(&self) -> Option<usize> {
        match self.position {
            Position::Cell(cell) => Some(cell),
            Position::Frame(_) => None,
        }
    }

    /// Raster index of the cell shown at the current position, in either mode.
    pub fn displayed_cell(&self) -> usize {
        match self.position {
            Position::Cell(cell) => cell,
            Position::Frame(frame) => self.frames.as_deref().map_or(0, |frames| frames[frame]),
        }
    }

    /// Length of the frame sequence, `None` when playing in raster order.
    pub fn frame_count(&self) -> Option<usize> {
        self.frames.as_ref().map(|frames| frames.len())
    }

    /// The frame sequence, `None` when playing in raster order.
    pub fn frames(&self) -> Option<&[usize]> {
        self.frames.as_deref()
    }

    /// Whole block rows on the sheet.
    pub fn row_count(&self) -> u32 {
        self.sheet.rows()
    }

    /// Whole block columns on the sheet.
    pub fn column_count(&self) -> u32 {
        self.sheet.columns()
    }

    /// Number of whole blocks on the sheet. Never zero.
    pub fn cell_count(&self) -> usize {
        self.sheet.cell_count()
    }

    /// Size of one block in sheet pixels.
    pub fn block_size(&self) -> BlockSize {
        self.sheet.block()
    }

    /// The decoded sheet currently played.
    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    /// The surface drawn onto.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the surface, e.g. to present it. Resizing it is allowed: later
    /// draws scale to whatever size it has.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The time source ticks are measured against.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of positions in the active counting mode. Never zero.
    fn count(&self) -> usize {
        self.frames
            .as_ref()
            .map_or(self.sheet.cell_count(), |frames| frames.len())
    }

    /// The source rectangle for `position`, translated through the frame sequence for
    /// [`Position::Frame`].
    ///
    /// Returns `None` if `position` is out of range, or is a frame while no sequence is set.
    pub fn resolve_source_rect(&self, position: Position) -> Option<Rect> {
        let cell = match position {
            Position::Cell(cell) => cell,
            Position::Frame(frame) => *self.frames.as_ref()?.get(frame)?,
        };
        (cell < self.sheet.cell_count()).then(|| self.sheet.cell_rect(cell))
    }

    /// The source rectangle of the current position.
    pub fn source_rect(&self) -> Rect {
        self.sheet.cell_rect(self.displayed_cell())
    }

    /// Switches to playing `frames` in order.
    ///
    /// An empty sequence switches back to raster order, like [`Animator::clear_frames`].
    /// Coming from raster order the position becomes the first frame; otherwise the
    /// current frame index is kept, clamped to the last frame of the new sequence.
    /// Fails, changing nothing, if a frame names a cell the sheet does not have.
    ///
    /// The surface is not redrawn: it keeps showing the previous cell until the next tick,
    /// step or [`Animator::refresh`].
    pub fn set_frames(&mut self, frames: &[usize]) -> Result<()> {
        if frames.is_empty() {
            self.clear_frames();
            return Ok(());
        }
        self.sheet.check_frames(frames)?;
        self.position = match self.position {
            Position::Frame(frame) => Position::Frame(frame.min(frames.len() - 1)),
            Position::Cell(_) => Position::Frame(0),
        };
        self.frames = Some(Frames::from_slice(frames));
        debug!("playing {} frames, now at {:?}", frames.len(), self.position);
        Ok(())
    }

    /// Switches back to raster order, starting at the first cell.
    ///
    /// Like [`Animator::set_frames`], this does not redraw the surface.
    pub fn clear_frames(&mut self) {
        if self.frames.take().is_some() {
            self.position = Position::Cell(0);
            debug!("playing all {} cells", self.sheet.cell_count());
        }
    }

    /// Cuts the sheet into blocks of a different size. The surface is resized to the new
    /// block and redrawn. In raster order the position is clamped to the new cell count.
    ///
    /// Fails, changing nothing, if the block does not fit the image or the frame sequence
    /// names cells the new grid does not have.
    pub fn set_block_size(&mut self, width: u32, height: u32) -> Result<()> {
        let block = BlockSize::new(width, height);
        let mut sheet = self.sheet.clone();
        sheet.set_block_size(block)?;
        self.replace_sheet(sheet)
    }

    /// Replaces the sprite sheet, keeping the block size. The surface is resized and
    /// redrawn. In raster order the position is clamped to the new cell count.
    ///
    /// Fails, changing nothing, if the image cannot be decoded, holds no block, or the
    /// frame sequence names cells it does not have.
    pub fn set_image(&mut self, source: impl Into<ImageSource>) -> Result<()> {
        let sheet = SpriteSheet::from_source(&source.into(), self.sheet.block())?;
        self.replace_sheet(sheet)
    }

    fn replace_sheet(&mut self, sheet: SpriteSheet) -> Result<()> {
        if let Some(frames) = &self.frames {
            sheet.check_frames(frames)?;
        }
        self.sheet = sheet;
        if let Position::Cell(cell) = self.position {
            self.position = Position::Cell(cell.min(self.sheet.cell_count() - 1));
        }
        self.fit_surface();
        self.redraw();
        Ok(())
    }

    /// Starts (or restarts) ticking every [`Animator::delay`] from the current position.
    pub fn play(&mut self) {
        self.update();
        self.timer = Some(Interval::new(self.clock.now(), self.delay));
        self.playback = Playback::Playing;
        debug!("playing from {:?} every {:?}", self.position, self.delay);
    }

    /// Stops ticking but keeps the position. Does nothing unless playing.
    pub fn pause(&mut self) {
        if self.playback != Playback::Playing {
            return;
        }
        self.cancel();
        self.playback = Playback::Paused;
        debug!("paused at {:?}", self.position);
    }

    /// Stops ticking and rewinds to the first position of the active mode.
    pub fn stop(&mut self) {
        self.cancel();
        self.playback = Playback::Stopped;
        self.position = self.position.with_index(0);
        debug!("stopped");
    }

    /// Pauses, then shows the next position.
    pub fn step_forward(&mut self) {
        self.step(1);
    }

    /// Pauses, then shows the previous position.
    pub fn step_backward(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        self.cancel();
        self.playback = Playback::Paused;
        self.advance(delta);
    }

    /// Plays the ticks that are due, then drops the timer.
    fn cancel(&mut self) {
        self.update();
        self.timer = None;
    }

    /// Redraws the current position without moving.
    pub fn refresh(&mut self) {
        self.redraw();
    }

    /// Moves `delta` positions through the active mode, wrapping at both ends, and redraws.
    pub fn advance(&mut self, delta: isize) {
        let index = wrap(self.position.index(), delta, self.count());
        self.position = self.position.with_index(index);
        self.redraw();
    }

    /// Plays every tick that came due since the last call. Returns the number of ticks.
    ///
    /// Each tick advances by one and redraws. When more than a full loop is due at once
    /// (say the host was suspended), the whole loops are skipped without drawing.
    pub fn update(&mut self) -> u64 {
        let now = self.clock.now();
        let ticks = match self.timer.as_mut() {
            Some(timer) => timer.poll(now),
            None => return 0,
        };
        let count = self.count() as u64;
        let mut remaining = ticks;
        if remaining > count {
            let skipped = remaining - count;
            trace!("skipping {skipped} overdue ticks");
            let index = wrap(self.position.index(), (skipped % count) as isize, self.count());
            self.position = self.position.with_index(index);
            remaining = count;
        }
        for _ in 0..remaining {
            self.advance(1);
        }
        ticks
    }

    /// Time until the next tick is due, `None` unless playing.
    pub fn time_until_tick(&self) -> Option<Duration> {
        self.timer
            .as_ref()
            .map(|timer| timer.remaining(self.clock.now()))
    }

    fn fit_surface(&mut self) {
        let block = self.sheet.block();
        self.surface.resize(block.width, block.height);
    }

    fn redraw(&mut self) {
        let cell = self.displayed_cell();
        let src = self.sheet.cell_rect(cell);
        self.surface.clear();
        self.surface.draw_region(self.sheet.image(), src);
        let event = DrawEvent {
            frame: self.current_frame(),
            cell,
            timestamp: self.clock.now(),
        };
        trace!("drew {:?} from {:?}", self.position, src);
        self.observers.notify(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use image::{DynamicImage, RgbaImage};

    use super::*;
    use crate::{sheet::tests::numbered_sheet, surface::Canvas, timer::ManualClock};

    const MS: Duration = Duration::from_millis(1);

    /// 128x64 sheet of 32x32 blocks: 4 columns, 2 rows.
    fn options() -> Options {
        let block = BlockSize::new(32, 32);
        Options::default()
            .image_handle(DynamicImage::ImageRgba8(numbered_sheet(128, 64, block)))
            .block_size(32, 32)
            .delay_ms(100.0)
    }

    fn animator(options: Options) -> (Animator<Canvas, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let animator =
            Animator::with_clock(options, Canvas::new(1, 1), clock.clone()).expect("valid options");
        (animator, clock)
    }

    /// Cell index encoded in the red channel by `numbered_sheet`.
    fn shown(animator: &Animator<Canvas, ManualClock>) -> usize {
        animator.surface().pixels().get_pixel(0, 0).0[0] as usize
    }

    #[test]
    fn construction() {
        let (a, _) = animator(options());
        assert_eq!(a.column_count(), 4);
        assert_eq!(a.row_count(), 2);
        assert_eq!(a.cell_count(), 8);
        assert_eq!(a.frame_count(), None);
        assert_eq!(a.current_cell(), Some(0));
        assert_eq!(a.current_frame(), None);
        assert_eq!(a.playback(), Playback::Stopped);
        assert_eq!(a.delay(), 100 * MS);
        assert_eq!(a.surface().size(), (32, 32));
        assert_eq!(shown(&a), 0);
    }

    #[test]
    fn missing_image() {
        let result = Animator::new(Options::default(), Canvas::default());
        assert!(matches!(result, Err(Error::MissingImage)));
    }

    #[test]
    fn bad_frames_rejected() {
        let result = Animator::new(options().frames([0, 8]), Canvas::default());
        assert!(matches!(
            result,
            Err(Error::FrameOutOfRange { frame: 8, cell_count: 8 })
        ));
    }

    #[test]
    fn empty_frames_mean_raster() {
        let (a, _) = animator(options().frames(vec![]));
        assert_eq!(a.frame_count(), None);
        assert_eq!(a.position(), Position::Cell(0));
    }

    #[test]
    fn raster_source_rect() {
        let (mut a, _) = animator(options());
        a.advance(5);
        assert_eq!(a.source_rect().origin(), (32, 32));
        assert_eq!(shown(&a), 5);
    }

    #[test]
    fn sequence_source_rect() {
        let (mut a, _) = animator(options().frames([0, 2, 2, 5]));
        a.step_forward();
        assert_eq!(a.current_frame(), Some(1));
        assert_eq!(a.displayed_cell(), 2);
        assert_eq!(a.source_rect().origin(), (64, 0));
        assert_eq!(a.resolve_source_rect(Position::Frame(3)), Some(Rect::new(32, 32, 32, 32)));
        assert_eq!(a.resolve_source_rect(Position::Frame(4)), None);
        assert_eq!(a.resolve_source_rect(Position::Cell(7)), Some(Rect::new(96, 32, 32, 32)));
        assert_eq!(a.resolve_source_rect(Position::Cell(8)), None);
    }

    #[test]
    fn resolve_frame_without_sequence() {
        let (a, _) = animator(options());
        assert_eq!(a.resolve_source_rect(Position::Frame(0)), None);
    }

    #[test]
    fn full_loop_returns_home() {
        for frames in [None, Some(vec![3, 1, 4, 1, 5])] {
            let mut opts = options();
            opts.frames = frames;
            let (mut a, _) = animator(opts);
            a.advance(2);
            let start = a.position();
            let count = a.frame_count().unwrap_or(a.cell_count());
            for _ in 0..count {
                a.advance(1);
            }
            assert_eq!(a.position(), start);
        }
    }

    #[test]
    fn backward_then_forward() {
        let (mut a, _) = animator(options());
        for start in 0..8 {
            a.stop();
            a.advance(start);
            a.advance(-1);
            a.advance(1);
            assert_eq!(a.current_cell(), Some(start as usize));
        }
        a.stop();
        a.step_backward();
        assert_eq!(a.current_cell(), Some(7));
        assert_eq!(shown(&a), 7);
    }

    #[test]
    fn stop_rewinds_from_any_state() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(300 * MS);
        a.stop();
        assert_eq!(a.current_cell(), Some(0));
        assert_eq!(a.playback(), Playback::Stopped);

        a.step_forward();
        a.step_forward();
        a.stop();
        assert_eq!(a.current_cell(), Some(0));

        a.set_frames(&[1, 2, 3]).expect("valid frames");
        a.step_forward();
        a.stop();
        assert_eq!(a.position(), Position::Frame(0));
    }

    #[test]
    fn play_pause_with_mock_clock() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(250 * MS);
        a.pause();
        assert_eq!(a.current_cell(), Some(2));
        assert_eq!(a.playback(), Playback::Paused);
        assert_eq!(shown(&a), 2);

        clock.advance(1000 * MS);
        assert_eq!(a.update(), 0);
        assert_eq!(a.current_cell(), Some(2));
    }

    #[test]
    fn resume_keeps_position() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(150 * MS);
        a.pause();
        a.play();
        clock.advance(99 * MS);
        assert_eq!(a.update(), 0);
        clock.advance(MS);
        assert_eq!(a.update(), 1);
        assert_eq!(a.current_cell(), Some(2));
    }

    #[test]
    fn play_is_idempotent() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(50 * MS);
        a.play();
        clock.advance(60 * MS);
        assert_eq!(a.update(), 0);
        clock.advance(40 * MS);
        assert_eq!(a.update(), 1);
        assert_eq!(a.current_cell(), Some(1));
    }

    #[test]
    fn ticks_wrap_in_sequence_mode() {
        let (mut a, clock) = animator(options().frames([6, 7]));
        a.play();
        clock.advance(300 * MS);
        assert_eq!(a.update(), 3);
        assert_eq!(a.current_frame(), Some(1));
        assert_eq!(shown(&a), 7);
    }

    #[test]
    fn overdue_loops_are_skipped() {
        let (mut a, clock) = animator(options());
        let draws = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&draws);
        a.on_draw(move |_| *counter.borrow_mut() += 1);
        a.play();
        clock.advance(100_003 * 100 * MS);
        assert_eq!(a.update(), 100_003);
        assert_eq!(a.current_cell(), Some(3));
        assert_eq!(*draws.borrow(), 8);
    }

    #[test]
    fn step_forces_pause() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(100 * MS);
        a.step_forward();
        assert_eq!(a.playback(), Playback::Paused);
        assert_eq!(a.current_cell(), Some(2));
        assert_eq!(a.time_until_tick(), None);
        clock.advance(500 * MS);
        assert_eq!(a.update(), 0);
    }

    #[test]
    fn pause_only_from_playing() {
        let (mut a, _) = animator(options());
        a.pause();
        assert_eq!(a.playback(), Playback::Stopped);
    }

    #[test]
    fn time_until_tick() {
        let (mut a, clock) = animator(options());
        assert_eq!(a.time_until_tick(), None);
        a.play();
        clock.advance(30 * MS);
        assert_eq!(a.time_until_tick(), Some(70 * MS));
    }

    #[test]
    fn set_frames_clamps() {
        let (mut a, _) = animator(options().frames([0, 1, 2, 3, 4, 5]));
        a.advance(4);
        a.set_frames(&[7, 6]).expect("valid frames");
        assert_eq!(a.current_frame(), Some(1));
        assert_eq!(a.displayed_cell(), 6);
        a.set_frames(&[0, 1, 2]).expect("valid frames");
        assert_eq!(a.current_frame(), Some(1));
    }

    #[test]
    fn set_frames_from_raster() {
        let (mut a, _) = animator(options());
        a.advance(3);
        a.set_frames(&[5, 4]).expect("valid frames");
        assert_eq!(a.position(), Position::Frame(0));
        assert_eq!(a.frame_count(), Some(2));
    }

    #[test]
    fn frame_changes_show_on_refresh() {
        let (mut a, _) = animator(options());
        a.advance(2);
        a.set_frames(&[5, 4]).expect("valid frames");
        assert_eq!(shown(&a), 2);
        a.refresh();
        assert_eq!(shown(&a), 5);
        a.clear_frames();
        assert_eq!(shown(&a), 5);
        a.refresh();
        assert_eq!(shown(&a), 0);
    }

    #[test]
    fn set_frames_rejects_and_keeps_state() {
        let (mut a, _) = animator(options().frames([1, 2]));
        a.advance(1);
        assert!(a.set_frames(&[1, 9]).is_err());
        assert_eq!(a.frames(), Some(&[1, 2][..]));
        assert_eq!(a.position(), Position::Frame(1));
    }

    #[test]
    fn empty_set_frames_falls_back() {
        let (mut a, _) = animator(options().frames([1, 2]));
        a.set_frames(&[]).expect("empty is fine");
        assert_eq!(a.frame_count(), None);
        assert_eq!(a.position(), Position::Cell(0));
    }

    #[test]
    fn clear_frames() {
        let (mut a, _) = animator(options().frames([4, 5]));
        a.advance(1);
        a.clear_frames();
        assert_eq!(a.position(), Position::Cell(0));
        a.advance(1);
        a.clear_frames();
        assert_eq!(a.position(), Position::Cell(1));
    }

    #[test]
    fn observers_receive_frames() {
        let (mut a, clock) = animator(options().frames([0, 2, 2, 5]));
        let seen = Rc::new(RefCell::new(vec![]));
        let log = Rc::clone(&seen);
        a.on_draw(move |e| log.borrow_mut().push((e.frame, e.cell, e.timestamp)));
        a.play();
        clock.advance(200 * MS);
        a.update();
        a.refresh();
        assert_eq!(
            *seen.borrow(),
            vec![
                (Some(1), 2, 200 * MS),
                (Some(2), 2, 200 * MS),
                (Some(2), 2, 200 * MS)
            ]
        );
    }

    #[test]
    fn raster_events_have_no_frame() {
        let (mut a, _) = animator(options());
        let seen = Rc::new(RefCell::new(vec![]));
        let log = Rc::clone(&seen);
        a.on_draw(move |e| log.borrow_mut().push(e.frame));
        a.step_forward();
        assert_eq!(*seen.borrow(), vec![None]);
    }

    #[test]
    fn set_delay_restarts_running_schedule() {
        let (mut a, clock) = animator(options());
        a.play();
        clock.advance(150 * MS);
        a.set_delay(20.0);
        assert_eq!(a.current_cell(), Some(1));
        assert_eq!(a.delay(), 20 * MS);
        clock.advance(40 * MS);
        assert_eq!(a.update(), 2);
    }

    #[test]
    fn set_delay_floor() {
        let (mut a, _) = animator(options());
        a.set_delay(-5.0);
        assert!(a.delay() > Duration::ZERO);
        assert_eq!(a.delay_ms(), 1.0);
    }

    #[test]
    fn reblock() {
        let (mut a, _) = animator(options());
        a.advance(7);
        a.set_block_size(64, 64).expect("valid block");
        assert_eq!(a.cell_count(), 2);
        assert_eq!(a.current_cell(), Some(1));
        assert_eq!(a.surface().size(), (64, 64));
        assert!(a.set_block_size(256, 8).is_err());
        assert_eq!(a.block_size(), BlockSize::new(64, 64));
    }

    #[test]
    fn reblock_checks_frames() {
        let (mut a, _) = animator(options().frames([7]));
        assert!(matches!(
            a.set_block_size(64, 64),
            Err(Error::FrameOutOfRange { frame: 7, cell_count: 2 })
        ));
        assert_eq!(a.cell_count(), 8);
    }

    #[test]
    fn swap_image() {
        let (mut a, _) = animator(options());
        a.advance(6);
        let smaller = numbered_sheet(64, 32, BlockSize::new(32, 32));
        a.set_image(DynamicImage::ImageRgba8(smaller)).expect("valid image");
        assert_eq!(a.cell_count(), 2);
        assert_eq!(a.current_cell(), Some(1));
        assert_eq!(shown(&a), 1);
        assert!(a.set_image(DynamicImage::ImageRgba8(RgbaImage::new(8, 8))).is_err());
        assert_eq!(a.cell_count(), 2);
    }

    #[test]
    fn scaled_surface() {
        let (mut a, _) = animator(options());
        a.surface_mut().resize(96, 96);
        a.step_forward();
        assert_eq!(a.surface().size(), (96, 96));
        assert_eq!(a.surface().pixels().get_pixel(95, 95).0[0], 1);
    }
}
