pub use crate::config::TrackerConfig;
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::{LifecycleError, Result};
pub use crate::events::{EventSink, LifecycleEvent, LogSink, RecordingSink, Step, Tee};
pub use crate::instance::{Instance, Phase, UpdateOutcome, UpdateRequest};
pub use crate::lifecycle::{
    AlwaysUpdate, HookContext, Lifecycle, NoPatch, RenderContext, StatePatch, UpdatePolicy,
};
pub use crate::node::{DomHandle, Node, NodeKind};
pub use crate::owner::{Delivery, FlushReport, InstanceKey, Owner};
pub use crate::props::{PropKind, PropSchema, PropWarning, Props};
pub use crate::scope::{Scope, current_scope};
