//! Router events and their subscribers.

use std::rc::Rc;

use super::core::RouterError;
use super::route::RouteInfo;

/// The three channels a router emits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterEventKind {
	BeforeRouteChange,
	AfterRouteChange,
	RouteError,
}

/// Payload of `beforeRouteChange` and `afterRouteChange`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChange {
	pub to: RouteInfo,
	pub from: Option<RouteInfo>,
}

/// Payload of `routeError`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFailure {
	/// The location the failed navigation targeted.
	pub path: String,
	pub error: RouterError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouterEvent {
	BeforeRouteChange(RouteChange),
	AfterRouteChange(RouteChange),
	RouteError(RouteFailure),
}

impl RouterEvent {
	pub fn kind(&self) -> RouterEventKind {
		match self {
			Self::BeforeRouteChange(_) => RouterEventKind::BeforeRouteChange,
			Self::AfterRouteChange(_) => RouterEventKind::AfterRouteChange,
			Self::RouteError(_) => RouterEventKind::RouteError,
		}
	}
}

/// Identifies a subscription for [`Router::off`](super::Router::off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(super) type EventCallback = Rc<dyn Fn(&RouterEvent)>;

/// Subscribers in registration order.
#[derive(Default)]
pub(super) struct Listeners {
	next_id: u64,
	entries: Vec<(ListenerId, RouterEventKind, EventCallback)>,
}

impl Listeners {
	pub(super) fn add(&mut self, kind: RouterEventKind, callback: EventCallback) -> ListenerId {
		self.next_id += 1;
		let id = ListenerId(self.next_id);
		self.entries.push((id, kind, callback));
		id
	}

	pub(super) fn remove(&mut self, id: ListenerId) -> bool {
		let before = self.entries.len();
		self.entries.retain(|(existing, _, _)| *existing != id);
		self.entries.len() != before
	}

	/// Callbacks for `kind` as of now.
	///
	/// Emission iterates this copy so callbacks may subscribe or
	/// unsubscribe without affecting the event in flight.
	pub(super) fn snapshot(&self, kind: RouterEventKind) -> Vec<EventCallback> {
		self.entries
			.iter()
			.filter(|(_, existing, _)| *existing == kind)
			.map(|(_, _, callback)| Rc::clone(callback))
			.collect()
	}

	pub(super) fn clear(&mut self) {
		self.entries.clear();
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.entries.len()
	}
}
