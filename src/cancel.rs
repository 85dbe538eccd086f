use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

/// Lifecycle of a run as driven by interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
	Running,
	/// First interrupt: finish up and print the summary
	StopRequested,
	/// Second interrupt: exit immediately
	ForceExit,
}

impl RunState {
	fn from_u8(value: u8) -> Self {
		match value {
			0 => RunState::Running,
			1 => RunState::StopRequested,
			_ => RunState::ForceExit,
		}
	}
}

/// Shared stop signal between the interrupt listener and the probe loop.
///
/// The listener is the only writer. Transitions are monotonic:
/// Running -> StopRequested -> ForceExit.
#[derive(Debug, Default)]
pub struct Cancellation {
	state: AtomicU8,
	token: CancellationToken,
}

impl Cancellation {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Advance the state by one step and return the new state.
	///
	/// The first call also cancels the token so in-flight waits wake up.
	pub fn request_stop(&self) -> RunState {
		let previous = self.state.fetch_add(1, Ordering::SeqCst);
		// saturate so repeated interrupts stay at ForceExit
		if previous >= 2 {
			self.state.store(2, Ordering::SeqCst);
		}
		self.token.cancel();
		RunState::from_u8(previous.saturating_add(1))
	}

	pub fn is_stopping(&self) -> bool {
		self.state() != RunState::Running
	}

	pub fn state(&self) -> RunState {
		RunState::from_u8(self.state.load(Ordering::SeqCst))
	}

	/// Token cancelled on the first interrupt
	pub fn token(&self) -> &CancellationToken {
		&self.token
	}
}

/// Spawn the interrupt listener.
///
/// First Ctrl-C requests a graceful stop; the second exits the process
/// with status 0 without printing the summary.
pub fn spawn_interrupt_listener(cancel: Arc<Cancellation>) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		loop {
			if let Err(e) = tokio::signal::ctrl_c().await {
				warn!("cannot listen for interrupts: {}", e);
				return;
			}
			match cancel.request_stop() {
				RunState::ForceExit => std::process::exit(0),
				state => debug!("interrupt received, state now {:?}", state),
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_initial_state() {
		let cancel = Cancellation::new();
		assert_eq!(cancel.state(), RunState::Running);
		assert!(!cancel.is_stopping());
		assert!(!cancel.token().is_cancelled());
	}

	#[test]
	fn test_transitions_are_monotonic() {
		let cancel = Cancellation::new();
		assert_eq!(cancel.request_stop(), RunState::StopRequested);
		assert!(cancel.is_stopping());
		assert!(cancel.token().is_cancelled());
		assert_eq!(cancel.request_stop(), RunState::ForceExit);
		assert_eq!(cancel.request_stop(), RunState::ForceExit);
		assert_eq!(cancel.state(), RunState::ForceExit);
	}

	#[tokio::test]
	async fn test_token_wakes_waiters() {
		let cancel = Cancellation::new();
		let waiter = {
			let cancel = cancel.clone();
			tokio::spawn(async move { cancel.token().cancelled().await })
		};
		cancel.request_stop();
		waiter.await.unwrap();
	}
}
