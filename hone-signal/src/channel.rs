use std::{
    cell::{Cell, RefCell},
    marker::PhantomData,
};

use crate::{Level, Levels, Signal};

type Handler = Box<dyn FnMut(&Signal)>;

/// One installed handler. The handler is taken out while it runs, so a
/// signal raised from inside a handler goes to the next handler out.
struct Entry {
    id: u64,
    levels: Levels,
    handler: Option<Handler>,
}

thread_local! {
    static HANDLERS: RefCell<Vec<Entry>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// Keeps a handler installed on the current thread until dropped.
///
/// Dropping the guard removes its handler and brings the previous one back,
/// including when the scope is left by unwinding. Guards are meant to be
/// dropped in the reverse order they were created in; dropping one out of
/// order removes only its own handler.
#[must_use = "the handler is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct HandlerGuard {
    id: u64,
    // Handlers live in thread-local storage; the guard must stay on its thread.
    _not_send: PhantomData<*const ()>,
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        // The thread's storage may already be gone during thread teardown.
        let _ = HANDLERS.try_with(|handlers| {
            let mut handlers = handlers.borrow_mut();
            if let Some(index) = handlers.iter().rposition(|entry| entry.id == self.id) {
                handlers.remove(index);
            }
        });
    }
}

/// Installs `handler` for signals whose level is in `levels`.
///
/// Signals with other levels skip this handler and go to the one installed
/// before it. The handler stays installed until the returned guard is
/// dropped.
pub fn install<H>(levels: Levels, handler: H) -> HandlerGuard
where
    H: FnMut(&Signal) + 'static,
{
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    HANDLERS.with_borrow_mut(|handlers| {
        handlers.push(Entry {
            id,
            levels,
            handler: Some(Box::new(handler)),
        });
    });

    HandlerGuard {
        id,
        _not_send: PhantomData,
    }
}

/// Returns the number of handlers installed on the current thread.
#[must_use]
pub fn depth() -> usize {
    HANDLERS.with_borrow(Vec::len)
}

/// Delivers `signal` to the innermost installed handler that accepts its
/// level.
///
/// With no such handler the signal is logged through `tracing`, at `error`
/// for error levels, `warn` for warnings and `info` otherwise.
pub fn raise(signal: &Signal) {
    let active = HANDLERS.with_borrow_mut(|handlers| {
        handlers
            .iter_mut()
            .rev()
            .filter(|entry| entry.levels.contains(signal.level()))
            .find_map(|entry| {
                entry.handler.take().map(|handler| Active {
                    id: entry.id,
                    handler: Some(handler),
                })
            })
    });

    match active {
        Some(mut active) => active.run(signal),
        None => log_unhandled(signal),
    }
}

/// Raises a signal with `level` and `message`, originating at the caller.
#[track_caller]
pub fn trigger(level: Level, message: impl Into<String>) {
    raise(&Signal::new(level, message));
}

/// A handler borrowed out of the stack while it runs.
///
/// Dropping it puts the handler back, unless its guard was dropped in the
/// meantime.
struct Active {
    id: u64,
    handler: Option<Handler>,
}

impl Active {
    fn run(&mut self, signal: &Signal) {
        if let Some(handler) = self.handler.as_mut() {
            handler(signal);
        }
    }
}

impl Drop for Active {
    fn drop(&mut self) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        let _ = HANDLERS.try_with(|handlers| {
            if let Ok(mut handlers) = handlers.try_borrow_mut()
                && let Some(entry) = handlers.iter_mut().find(|entry| entry.id == self.id)
            {
                entry.handler = Some(handler);
            }
        });
    }
}

fn log_unhandled(signal: &Signal) {
    let code = signal.code();
    let file = signal.file();
    let line = signal.line();
    let message = signal.message();

    match signal.level() {
        Level::Error | Level::UserError => {
            tracing::error!(code, file, line, "unhandled signal: {message}");
        }
        Level::Warning | Level::UserWarning => {
            tracing::warn!(code, file, line, "unhandled signal: {message}");
        }
        _ => {
            tracing::info!(code, file, line, "unhandled signal: {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        panic::{self, AssertUnwindSafe},
        rc::Rc,
    };

    /// Installs a handler that appends signal messages to a shared log.
    fn recorder(levels: Levels) -> (HandlerGuard, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let guard = install(levels, move |signal: &Signal| {
            sink.borrow_mut().push(signal.message().to_string());
        });
        (guard, log)
    }

    #[test]
    fn delivers_to_innermost_handler() {
        let (outer, outer_log) = recorder(Levels::ALL);
        let (inner, inner_log) = recorder(Levels::ALL);

        trigger(Level::Notice, "first");
        drop(inner);
        trigger(Level::Notice, "second");
        drop(outer);

        assert_eq!(*inner_log.borrow(), ["first"]);
        assert_eq!(*outer_log.borrow(), ["second"]);
    }

    #[test]
    fn raising_borrows_the_signal() {
        let (_guard, log) = recorder(Levels::ALL);
        let signal = Signal::new(Level::UserNotice, "again").with_context("attempt", 1);

        raise(&signal);
        raise(&signal);

        assert_eq!(*log.borrow(), ["again", "again"]);
        assert_eq!(signal.context()["attempt"], "1");
    }

    #[test]
    fn guard_restores_depth() {
        let before = depth();
        {
            let _outer = recorder(Levels::ALL);
            let _inner = recorder(Levels::ALL);
            assert_eq!(depth(), before + 2);
        }
        assert_eq!(depth(), before);
    }

    #[test]
    fn filtered_levels_fall_through() {
        let (_outer, outer_log) = recorder(Levels::ALL);
        let (_inner, inner_log) = recorder(Level::UserError | Level::UserWarning);

        trigger(Level::UserWarning, "kept");
        trigger(Level::Deprecated, "passed on");

        assert_eq!(*inner_log.borrow(), ["kept"]);
        assert_eq!(*outer_log.borrow(), ["passed on"]);
    }

    #[test]
    fn signal_raised_inside_handler_goes_outward() {
        let (_outer, outer_log) = recorder(Levels::ALL);
        let _inner = install(Levels::ALL, |signal: &Signal| {
            trigger(Level::Notice, format!("saw {}", signal.message()));
        });

        trigger(Level::Warning, "disk");
        trigger(Level::Warning, "net");

        assert_eq!(*outer_log.borrow(), ["saw disk", "saw net"]);
    }

    #[test]
    fn out_of_order_drop_removes_only_its_handler() {
        let (outer, outer_log) = recorder(Levels::ALL);
        let (inner, inner_log) = recorder(Levels::ALL);

        drop(outer);
        trigger(Level::Notice, "still inner");
        drop(inner);

        assert_eq!(*inner_log.borrow(), ["still inner"]);
        assert!(outer_log.borrow().is_empty());
    }

    #[test]
    fn guard_restores_on_unwind() {
        let before = depth();
        let (_outer, outer_log) = recorder(Levels::ALL);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _inner = recorder(Levels::ALL);
            panic!("handler scope unwinds");
        }));

        assert!(result.is_err());
        assert_eq!(depth(), before + 1);

        trigger(Level::Notice, "after unwind");
        assert_eq!(*outer_log.borrow(), ["after unwind"]);
    }

    #[test]
    fn unhandled_signals_do_not_panic() {
        let before = depth();
        trigger(Level::Error, "nobody listening");
        trigger(Level::UserNotice, "still nobody");
        assert_eq!(depth(), before);
    }

    #[test]
    fn origin_is_trigger_caller() {
        let origins = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&origins);
        let _guard = install(Levels::ALL, move |signal: &Signal| {
            sink.borrow_mut().push((signal.file(), signal.line()));
        });

        let line = line!() + 1;
        trigger(Level::UserNotice, "here");

        assert_eq!(*origins.borrow(), [(file!(), line)]);
    }
}
