//! Local task spawning
//!
//! Component updates are coalesced into microtasks and router resolutions
//! run as detached futures. In the browser both ride on
//! `wasm_bindgen_futures::spawn_local`, which drains on the microtask queue.
//! Native builds use a thread-local [`futures::executor::LocalPool`] that
//! tests drive explicitly with [`run_until_stalled`] or [`block_on`].

use std::future::Future;

/// Spawns a `!Send` future on the current thread's executor.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a `!Send` future on the current thread's executor.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	native::spawn(future);
}

/// Queues `task` to run after the current synchronous work completes.
pub fn queue_microtask<F>(task: F)
where
	F: FnOnce() + 'static,
{
	spawn_local(async move { task() });
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{block_on, run_until_stalled};

#[cfg(not(target_arch = "wasm32"))]
mod native {
	use std::cell::RefCell;
	use std::future::Future;

	use futures::executor::{LocalPool, LocalSpawner};
	use futures::task::LocalSpawnExt;

	struct Executor {
		pool: RefCell<LocalPool>,
		spawner: LocalSpawner,
	}

	thread_local! {
		static EXECUTOR: Executor = {
			let pool = LocalPool::new();
			let spawner = pool.spawner();
			Executor { pool: RefCell::new(pool), spawner }
		};
	}

	pub(super) fn spawn<F>(future: F)
	where
		F: Future<Output = ()> + 'static,
	{
		EXECUTOR.with(|executor| {
			if let Err(err) = executor.spawner.spawn_local(future) {
				crate::error_log!("failed to spawn local task: {}", err);
			}
		});
	}

	/// Runs every queued task until none can make progress.
	///
	/// Calling this from inside a running task is a no-op.
	pub fn run_until_stalled() {
		EXECUTOR.with(|executor| {
			if let Ok(mut pool) = executor.pool.try_borrow_mut() {
				pool.run_until_stalled();
			}
		});
	}

	/// Drives `future` to completion, running spawned tasks alongside it.
	///
	/// Tasks still pending when `future` resolves stay queued; follow up with
	/// [`run_until_stalled`] to drain them. Must not be called from inside a
	/// spawned task.
	pub fn block_on<F: Future>(future: F) -> F::Output {
		EXECUTOR.with(|executor| executor.pool.borrow_mut().run_until(future))
	}
}
