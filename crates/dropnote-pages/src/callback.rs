//! Callback props
//!
//! Components receive event hooks from their parents as [`Callback`] values.
//! Props must be comparable for change detection, so two callbacks are equal
//! only when they share the same closure.
//!
//! ## Example
//!
//! ```ignore
//! use dropnote_pages::Callback;
//!
//! let scope = ctx.scope();
//! let on_click = Callback::new(move |()| {
//!     scope.set_state(|state| state.count += 1);
//! });
//! ```

use std::rc::Rc;

/// A cloneable, pointer-compared function wrapper.
///
/// ## Type Parameters
///
/// - `Args`: The argument the callback receives (defaults to `()`)
/// - `Ret`: The return type of the callback (defaults to `()`)
pub struct Callback<Args = (), Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> PartialEq for Callback<Args, Ret> {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback").finish_non_exhaustive()
	}
}

impl<F, Args, Ret> From<F> for Callback<Args, Ret>
where
	F: Fn(Args) -> Ret + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}
