//! # Lifecycle tracking
//!
//! A component here is a plain struct implementing [`Lifecycle`]; it never
//! schedules itself. An [`Instance`] owns the component together with its
//! props, state and surface, and walks it through the phases:
//!
//! - `Mounting` — created, nothing rendered yet.
//! - `Mounted` — first render applied, `did_mount` has run.
//! - `Updating` — an approved update is between render and `did_update`.
//! - `Unmounted` — torn down; terminal.
//!
//! ## Hooks
//!
//! Every render attempt starts with `derive_state_from_props`, a pure
//! associated function that may return a state patch. Updates then pass the
//! `should_update` veto gate; an approved update renders, captures a snapshot
//! from the surface that is still showing the old output, applies the new
//! output and finally calls `did_update` with that snapshot.
//!
//! ```rust
//! use lifecycle_core::*;
//! use std::rc::Rc;
//!
//! struct Counter;
//!
//! impl Lifecycle for Counter {
//!     type State = u32;
//!     type Patch = NoPatch;
//!     type Snapshot = ();
//!     const NAME: &'static str = "Counter";
//!
//!     fn initial_state(&self, _props: &Props) -> u32 {
//!         0
//!     }
//!
//!     fn render(&self, _cx: &RenderContext<'_>, state: &u32) -> Result<Node> {
//!         Ok(Node::heading(state.to_string()))
//!     }
//! }
//!
//! let sink = RecordingSink::new();
//! let mut counter = Instance::create(
//!     Counter,
//!     Props::new(),
//!     Rc::new(sink.clone()),
//!     TrackerConfig::default(),
//! );
//! counter.mount()?;
//! counter.set_state(|n| *n += 1)?;
//! assert_eq!(*counter.state(), 1);
//! assert_eq!(sink.count(Step::Render), 2);
//! # Ok::<(), LifecycleError>(())
//! ```
//!
//! ## Events
//!
//! Each step is recorded as a [`LifecycleEvent`] into an injected
//! [`EventSink`]. [`RecordingSink`] keeps them for inspection, [`LogSink`]
//! forwards them to `log`.
//!
//! ## Cleanup
//!
//! `did_mount` runs inside the instance [`Scope`]: cleanups registered there
//! (directly or through [`effect`]) run when the instance unmounts.

pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod instance;
pub mod lifecycle;
pub mod node;
pub mod owner;
pub mod prelude;
pub mod props;
pub mod scope;

pub use config::*;
pub use effects::*;
pub use error::*;
pub use events::*;
pub use instance::*;
pub use lifecycle::*;
pub use node::*;
pub use owner::*;
pub use props::*;
pub use scope::*;
