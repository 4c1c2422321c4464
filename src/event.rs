//! Events going out of an animator (draw notifications) and coming into a player
//! (keyboard controls).
use std::{fmt, time::Duration};

use crossterm::event::{self, KeyCode, KeyEventKind};

/// Sent to every observer after a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawEvent {
    /// Position within the frame sequence, `None` when playing in raster order.
    pub frame: Option<usize>,
    /// Raster index of the cell that was drawn.
    pub cell: usize,
    /// Clock reading at the time of the draw.
    pub timestamp: Duration,
}

type Observer = Box<dyn FnMut(&DrawEvent)>;

/// Append-only list of draw observers, invoked in registration order.
#[derive(Default)]
pub struct Observers {
    list: Vec<Observer>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F: FnMut(&DrawEvent) + 'static>(&mut self, observer: F) {
        self.list.push(Box::new(observer));
    }

    pub fn notify(&mut self, event: &DrawEvent) {
        for observer in &mut self.list {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.list.len())
            .finish()
    }
}

/// Player controls, as read from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Space: play when stopped or paused, pause when playing.
    TogglePlay,
    /// `s`
    Stop,
    /// Right arrow or `l`
    StepForward,
    /// Left arrow or `h`
    StepBackward,
    /// `+`: halve the delay.
    Faster,
    /// `-`: double the delay.
    Slower,
    /// `r`
    Refresh,
    /// `q` or Esc
    Quit,
}

impl Control {
    pub fn from_crossterm_event(event: event::Event) -> Option<Self> {
        match event {
            event::Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char(' ') => Some(Control::TogglePlay),
                KeyCode::Char('s') => Some(Control::Stop),
                KeyCode::Right | KeyCode::Char('l') => Some(Control::StepForward),
                KeyCode::Left | KeyCode::Char('h') => Some(Control::StepBackward),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(Control::Faster),
                KeyCode::Char('-') => Some(Control::Slower),
                KeyCode::Char('r') => Some(Control::Refresh),
                KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    #[test]
    fn observers_in_order() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut observers = Observers::new();
        for id in 0..3 {
            let seen = Rc::clone(&seen);
            observers.push(move |e: &DrawEvent| seen.borrow_mut().push((id, e.cell)));
        }
        assert_eq!(observers.len(), 3);
        observers.notify(&DrawEvent {
            frame: None,
            cell: 7,
            timestamp: Duration::ZERO,
        });
        assert_eq!(*seen.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    fn key(code: KeyCode) -> event::Event {
        event::Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn key_mapping() {
        assert_eq!(
            Control::from_crossterm_event(key(KeyCode::Char(' '))),
            Some(Control::TogglePlay)
        );
        assert_eq!(
            Control::from_crossterm_event(key(KeyCode::Left)),
            Some(Control::StepBackward)
        );
        assert_eq!(Control::from_crossterm_event(key(KeyCode::Esc)), Some(Control::Quit));
        assert_eq!(Control::from_crossterm_event(key(KeyCode::Char('x'))), None);
        assert_eq!(Control::from_crossterm_event(event::Event::FocusLost), None);
    }

    #[test]
    fn key_release_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(Control::from_crossterm_event(event::Event::Key(release)), None);
    }
}
