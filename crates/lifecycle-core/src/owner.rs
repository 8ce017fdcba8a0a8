use std::any::Any;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::config::TrackerConfig;
use crate::error::{LifecycleError, Result};
use crate::events::EventSink;
use crate::instance::{Instance, Phase, UpdateOutcome, UpdateRequest};
use crate::lifecycle::Lifecycle;
use crate::props::Props;

new_key_type! {
    pub struct InstanceKey;
}

/// Type-erased view of an `Instance<C>` for the registry.
trait AnyInstance {
    fn name(&self) -> &'static str;
    fn phase(&self) -> Phase;
    fn mount(&mut self) -> Result<()>;
    fn deliver(&mut self, updates: Vec<Update>) -> Result<UpdateOutcome>;
    fn teardown(&mut self) -> Result<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Lifecycle> AnyInstance for Instance<C> {
    fn name(&self) -> &'static str {
        C::NAME
    }
    fn phase(&self) -> Phase {
        Instance::phase(self)
    }
    fn mount(&mut self) -> Result<()> {
        Instance::mount(self)
    }
    fn deliver(&mut self, updates: Vec<Update>) -> Result<UpdateOutcome> {
        let request = updates
            .into_iter()
            .map(|u| match u {
                Update::Props(p) => UpdateRequest::props(p),
                Update::Force => UpdateRequest::force(),
            })
            .fold(UpdateRequest::new(), UpdateRequest::merge);
        self.request_update(request)
    }
    fn teardown(&mut self) -> Result<()> {
        self.request_teardown()
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

enum Update {
    Props(Props),
    Force,
}

#[derive(Default)]
struct Pending {
    updates: Vec<Update>,
    teardown: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Updated(UpdateOutcome),
    TornDown,
}

/// Result of one `flush`. A failing instance does not stop delivery to the
/// rest.
#[derive(Debug, Default)]
pub struct FlushReport {
    pub delivered: Vec<(InstanceKey, Delivery)>,
    pub errors: Vec<(InstanceKey, LifecycleError)>,
}

impl FlushReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The external container: creates instances, queues render triggers and
/// delivers them one resolved request per instance.
pub struct Owner {
    instances: SlotMap<InstanceKey, Box<dyn AnyInstance>>,
    queue: Vec<(InstanceKey, Pending)>,
    sink: Rc<dyn EventSink>,
    config: TrackerConfig,
}

impl Owner {
    pub fn new(sink: Rc<dyn EventSink>, config: TrackerConfig) -> Self {
        Self {
            instances: SlotMap::with_key(),
            queue: Vec::new(),
            sink,
            config,
        }
    }

    pub fn insert<C: Lifecycle>(&mut self, component: C, props: Props) -> InstanceKey {
        let inst = Instance::create(component, props, self.sink.clone(), self.config);
        self.instances.insert(Box::new(inst))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn phase(&self, key: InstanceKey) -> Option<Phase> {
        self.instances.get(key).map(|i| i.phase())
    }

    pub fn name(&self, key: InstanceKey) -> Option<&'static str> {
        self.instances.get(key).map(|i| i.name())
    }

    /// Mounting is synchronous; it does not go through the queue.
    pub fn mount(&mut self, key: InstanceKey) -> Result<()> {
        self.instances
            .get_mut(key)
            .ok_or(LifecycleError::UnknownInstance)?
            .mount()
    }

    pub fn request_update(&mut self, key: InstanceKey, props: Props) -> Result<()> {
        self.enqueue(key, "request_update", Some(Update::Props(props)))
    }

    pub fn force_update(&mut self, key: InstanceKey) -> Result<()> {
        self.enqueue(key, "request_update", Some(Update::Force))
    }

    pub fn request_teardown(&mut self, key: InstanceKey) -> Result<()> {
        self.enqueue(key, "request_teardown", None)
    }

    /// `None` queues a teardown. Nothing can be queued behind a teardown,
    /// pending or applied.
    fn enqueue(&mut self, key: InstanceKey, op: &'static str, update: Option<Update>) -> Result<()> {
        let inst = self
            .instances
            .get(key)
            .ok_or(LifecycleError::UnknownInstance)?;
        if inst.phase() == Phase::Unmounted {
            return Err(LifecycleError::PostUnmount { op });
        }

        let idx = match self.queue.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.queue.push((key, Pending::default()));
                self.queue.len() - 1
            }
        };
        let entry = &mut self.queue[idx].1;
        if entry.teardown {
            return Err(LifecycleError::PostUnmount { op });
        }
        match update {
            Some(u) => entry.updates.push(u),
            None => entry.teardown = true,
        }
        Ok(())
    }

    /// Instances with queued triggers.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Delivers one resolved request per instance, in first-enqueued order:
    /// queued updates merge (latest props, sticky force); a teardown replaces
    /// whatever updates were queued before it.
    pub fn flush(&mut self) -> FlushReport {
        let queue = std::mem::take(&mut self.queue);

        let mut report = FlushReport::default();
        for (key, pending) in queue {
            let Some(inst) = self.instances.get_mut(key) else {
                report.errors.push((key, LifecycleError::UnknownInstance));
                continue;
            };

            let result = if pending.teardown {
                inst.teardown().map(|_| Delivery::TornDown)
            } else {
                inst.deliver(pending.updates).map(Delivery::Updated)
            };
            match result {
                Ok(d) => report.delivered.push((key, d)),
                Err(e) => {
                    log::warn!("{}: trigger failed: {}", inst.name(), e);
                    report.errors.push((key, e));
                }
            }
        }
        report
    }

    /// Typed access, e.g. to run an event handler or propose a state change.
    pub fn with<C: Lifecycle, R>(
        &mut self,
        key: InstanceKey,
        f: impl FnOnce(&mut Instance<C>) -> R,
    ) -> Result<R> {
        let inst = self
            .instances
            .get_mut(key)
            .and_then(|i| i.as_any_mut().downcast_mut::<Instance<C>>())
            .ok_or(LifecycleError::UnknownInstance)?;
        Ok(f(inst))
    }

    /// Drops the instance, tearing it down first if it is still live.
    pub fn remove(&mut self, key: InstanceKey) -> bool {
        let Some(mut inst) = self.instances.remove(key) else {
            return false;
        };
        if inst.phase() != Phase::Unmounted
            && let Err(e) = inst.teardown()
        {
            log::warn!("{}: teardown on remove failed: {}", inst.name(), e);
        }
        self.queue.retain(|(k, _)| *k != key);
        true
    }
}
