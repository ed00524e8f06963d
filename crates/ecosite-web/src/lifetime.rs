#![forbid(unsafe_code)]

//! Page-lifetime ownership.
//!
//! Values handed to JS can be finalized whenever the caller drops its
//! handle. Anything whose callbacks stay registered with the browser is
//! parked here instead, and lives until the page unloads.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static RETAINED: RefCell<Vec<Rc<dyn Any>>> = const { RefCell::new(Vec::new()) };
}

/// Keep `value` alive for the rest of the page.
pub fn retain_for_page<T: 'static>(value: &Rc<T>) {
    let value: Rc<dyn Any> = value.clone();
    RETAINED.with(|slot| slot.borrow_mut().push(value));
}

/// Whether a value of type `T` is already retained.
pub fn is_retained<T: 'static>() -> bool {
    RETAINED.with(|slot| slot.borrow().iter().any(|value| (**value).is::<T>()))
}
