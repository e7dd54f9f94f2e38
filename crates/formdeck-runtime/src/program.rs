#![forbid(unsafe_code)]

//! Model/update/view runtime.
//!
//! A [`Model`] owns the application state; the [`Program`] owns the
//! terminal. Input is read on a dedicated thread and funnelled through an
//! mpsc channel together with completed background task results, so
//! `update` always runs on the main thread and never blocks on I/O.
//!
//! Background work goes through [`Cmd::task`]: the closure runs on a
//! spawned thread and its return value comes back to `update` as an
//! ordinary message. There is no async runtime underneath.

use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use tracing::{debug, info, warn};

use crate::event::Event;
use crate::surface::Surface;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state.
    /// Must be convertible from terminal events.
    type Message: From<Event> + Send + 'static;

    /// Initialize the model with startup commands.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state to the surface.
    fn view(&self, surface: &mut Surface);
}

/// Commands represent side effects to be executed by the runtime.
///
/// Returned from `init()` and `update()` to trigger actions like quitting,
/// sending follow-up messages, or running background work.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Execute a blocking operation on a background thread. The return
    /// value is sent back as a message to the model.
    Task(Box<dyn FnOnce() -> M + Send>),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Task(_) => write!(f, "Task"),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a batch of commands. Empty batches collapse to `None`,
    /// single-element batches to the command itself.
    pub fn batch(cmds: Vec<Self>) -> Self {
        if cmds.is_empty() {
            Self::None
        } else if cmds.len() == 1 {
            cmds.into_iter()
                .next()
                .expect("non-empty vec has at least one element")
        } else {
            Self::Batch(cmds)
        }
    }

    /// Create a background task command.
    ///
    /// The closure runs on a spawned thread. When it completes, the
    /// returned message is sent back to the model's `update()`.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Task(_) => "Task",
        }
    }
}

/// Errors from running a program.
#[derive(Debug)]
pub enum ProgramError {
    /// Terminal or rendering I/O failed.
    Io(io::Error),
    /// The message channel closed unexpectedly.
    ChannelClosed,
}

impl std::fmt::Display for ProgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o error: {err}"),
            Self::ChannelClosed => write!(f, "message channel closed unexpectedly"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::ChannelClosed => None,
        }
    }
}

impl From<io::Error> for ProgramError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// What arrives on the runtime's inbox: raw terminal events (still to be
/// converted to model messages) and completed task results.
enum Inbox<M> {
    Event(Event),
    Message(M),
}

/// Restores the terminal on drop so panics and early returns cannot leave
/// raw mode enabled.
struct TerminalGuard;

impl TerminalGuard {
    fn install() -> Result<Self, ProgramError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = disable_raw_mode();
    }
}

/// Drives a [`Model`] against a real terminal.
pub struct Program<M: Model> {
    model: M,
}

impl<M: Model> Program<M> {
    /// Create a program around an initialized model.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Run the event loop until the model returns [`Cmd::Quit`].
    ///
    /// Takes over the terminal (raw mode, alternate screen) and restores
    /// it on exit, including on error.
    pub fn run(mut self) -> Result<M, ProgramError> {
        let _guard = TerminalGuard::install()?;
        let (width, height) = terminal::size()?;
        let mut surface = Surface::new(width, height);

        let (tx, rx) = mpsc::channel::<Inbox<M::Message>>();
        spawn_input_thread(tx.clone());

        info!(width, height, "program started");

        let init_cmd = self.model.init();
        let mut quit = self.execute(init_cmd, &tx);
        while !quit {
            surface.clear();
            self.model.view(&mut surface);
            let mut out = io::stdout();
            surface.present(&mut out)?;
            out.flush()?;

            let inbox = rx.recv().map_err(|_| ProgramError::ChannelClosed)?;
            let msg = match inbox {
                Inbox::Event(event) => {
                    if let Event::Resize { width, height } = event {
                        surface.resize(width, height);
                    }
                    M::Message::from(event)
                }
                Inbox::Message(msg) => msg,
            };
            let cmd = self.model.update(msg);
            quit = self.execute(cmd, &tx);
        }

        info!("program stopped");
        Ok(self.model)
    }

    /// Execute a command tree. Returns `true` if the program should quit.
    fn execute(&mut self, cmd: Cmd<M::Message>, tx: &mpsc::Sender<Inbox<M::Message>>) -> bool {
        let mut stack = vec![cmd];
        let mut quit = false;
        while let Some(cmd) = stack.pop() {
            match cmd {
                Cmd::None => {}
                Cmd::Quit => quit = true,
                Cmd::Batch(cmds) => {
                    // Preserve order; the stack pops in reverse.
                    stack.extend(cmds.into_iter().rev());
                }
                Cmd::Msg(msg) => {
                    let next = self.model.update(msg);
                    stack.push(next);
                }
                Cmd::Task(f) => {
                    debug!("spawning background task");
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let msg = f();
                        if tx.send(Inbox::Message(msg)).is_err() {
                            warn!("task result dropped: program already stopped");
                        }
                    });
                }
            }
        }
        quit
    }
}

/// Reads crossterm events on a dedicated thread. The thread exits when the
/// receiving side of the channel is gone.
fn spawn_input_thread<M: Send + 'static>(tx: mpsc::Sender<Inbox<M>>) {
    thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(raw) => {
                    let Some(event) = Event::from_crossterm(raw) else {
                        continue;
                    };
                    if tx.send(Inbox::Event(event)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("input read failed: {err}");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_collapses_empty_and_singleton() {
        let empty: Cmd<()> = Cmd::batch(vec![]);
        assert!(matches!(empty, Cmd::None));

        let single: Cmd<()> = Cmd::batch(vec![Cmd::quit()]);
        assert!(matches!(single, Cmd::Quit));

        let multi: Cmd<()> = Cmd::batch(vec![Cmd::none(), Cmd::quit()]);
        assert!(matches!(multi, Cmd::Batch(ref cmds) if cmds.len() == 2));
    }

    #[test]
    fn cmd_type_names() {
        assert_eq!(Cmd::<()>::none().type_name(), "None");
        assert_eq!(Cmd::<()>::quit().type_name(), "Quit");
        assert_eq!(Cmd::msg(()).type_name(), "Msg");
        assert_eq!(Cmd::task(|| ()).type_name(), "Task");
        assert_eq!(Cmd::<()>::batch(vec![Cmd::Quit, Cmd::None]).type_name(), "Batch");
    }

    #[test]
    fn cmd_debug_hides_task_closure() {
        let task: Cmd<u8> = Cmd::task(|| 1);
        assert_eq!(format!("{task:?}"), "Task");
    }

    #[test]
    fn program_error_display() {
        let err = ProgramError::from(io::Error::other("boom"));
        assert!(err.to_string().contains("boom"));
        assert_eq!(
            ProgramError::ChannelClosed.to_string(),
            "message channel closed unexpectedly"
        );
    }
}
