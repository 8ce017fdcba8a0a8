use std::cell::Cell;
use std::rc::Rc;

type Cleanup = Box<dyn FnOnce()>;

/// A one-shot cleanup handle. Clones share the same cleanup.
#[derive(Clone)]
pub struct Dispose(Rc<Cell<Option<Cleanup>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(Cell::new(Some(Box::new(f)))))
    }

    /// Idempotent.
    pub fn run(&self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// Starts a side effect now. When called from a mount hook, its cleanup is
/// tied to the instance scope and runs at unmount; the returned handle can
/// also run it earlier.
pub fn effect<F>(start: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let cleanup = start();

    match crate::scope::current_scope() {
        Some(scope) => {
            let handle = cleanup.clone();
            scope.add_disposer(move || handle.run());
        }
        None => log::debug!("effect started outside a scope; cleanup is manual"),
    }

    cleanup
}

/// Wraps a cleanup for returning from an `effect` body.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
