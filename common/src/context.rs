use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// A cancellable scope that long-running tasks hold on to.
///
/// Every clone keeps the scope alive. [`Handler::cancel`] signals all clones
/// and then waits for the last one to be dropped, which is how shutdown knows
/// that in-flight work has finished.
#[derive(Clone, Debug)]
pub struct Context {
	token: CancellationToken,
	_alive: Arc<oneshot::Sender<()>>,
}

#[derive(Debug)]
pub struct Handler {
	token: CancellationToken,
	alive: oneshot::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		let (sender, alive) = oneshot::channel();
		let token = CancellationToken::new();

		(
			Self {
				token: token.clone(),
				_alive: Arc::new(sender),
			},
			Handler { token, alive },
		)
	}

	/// A context that is cancelled with its parent but can also be cancelled
	/// on its own through the returned token.
	pub fn child(&self) -> (Self, CancellationToken) {
		let token = self.token.child_token();
		(
			Self {
				token: token.clone(),
				_alive: self._alive.clone(),
			},
			token,
		)
	}

	pub async fn done(&self) {
		self.token.cancelled().await
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Handler {
	/// Resolves once every context clone has been dropped, without cancelling.
	pub async fn done(&mut self) {
		let _ = (&mut self.alive).await;
	}

	pub async fn cancel(self) {
		self.token.cancel();

		let _ = self.alive.await;
	}
}
