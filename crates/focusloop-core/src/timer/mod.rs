mod clock;
pub mod scheduler;
mod session;
mod state;
pub mod ticker;

pub use clock::{SessionClock, TickOutcome};
pub use scheduler::{on_session_complete, FocusCompletion, Transition};
pub use session::SessionType;
pub use state::TimerState;
pub use ticker::{IntervalTicker, ManualTicker, Tick, TickHandle, TickSource};
