use std::cell::RefCell;
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Owns the cleanups registered while an instance is mounted (timers,
/// subscriptions, ...). Disposed when the instance unmounts, or when the last
/// handle is dropped.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

#[derive(Default)]
struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl ScopeInner {
    fn drain(&self) {
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

/// Restores the previously current scope, also on unwind.
struct Restore(Option<Weak<ScopeInner>>);

impl Drop for Restore {
    fn drop(&mut self) {
        let prev = self.0.take();
        CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
    }
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with this scope as the current one, so `effect` calls inside
    /// register their cleanup here.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let prev = CURRENT_SCOPE.with(|current| current.replace(Some(Rc::downgrade(&self.inner))));
        let _restore = Restore(prev);
        f()
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    /// Cleanups not yet run.
    pub fn pending(&self) -> usize {
        self.inner.disposers.borrow().len()
    }

    /// Runs cleanups in registration order. Safe to call
    /// again; later calls only run cleanups added since.
    pub fn dispose(&self) {
        let n = self.pending();
        self.inner.drain();
        if n > 0 {
            log::debug!("scope disposed {n} cleanup(s)");
        }
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        let inner = current.borrow().as_ref()?.upgrade()?;
        Some(Scope { inner })
    })
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.drain();
    }
}
