//! Host automation over `IParameterChanges` / `IParamValueQueue`.

use vst3::ComRef;
use vst3::Steinberg::kResultOk;
use vst3::Steinberg::Vst::{
    IParamValueQueue, IParamValueQueueTrait, IParameterChanges, IParameterChangesTrait,
};

use wrapclap_core::{HostParameterChanges, HostParameterQueue, HostPoint, ParameterId};

/// The host's input parameter changes for one processing call.
pub struct Vst3ParameterChanges<'a> {
    changes: ComRef<'a, IParameterChanges>,
}

impl<'a> Vst3ParameterChanges<'a> {
    pub fn new(changes: ComRef<'a, IParameterChanges>) -> Self {
        Self { changes }
    }

    /// Wrap a raw pointer. Returns `None` for null.
    ///
    /// # Safety
    /// `changes` must be null or point to a live `IParameterChanges` for `'a`.
    pub unsafe fn from_raw(changes: *mut IParameterChanges) -> Option<Self> {
        ComRef::from_raw(changes).map(Self::new)
    }
}

impl HostParameterChanges for Vst3ParameterChanges<'_> {
    type Queue<'q> = Vst3ParamQueue<'q> where Self: 'q;

    fn parameter_count(&self) -> usize {
        // SAFETY: the host object is live for the lifetime of this wrapper.
        let count = unsafe { self.changes.getParameterCount() };
        count.max(0) as usize
    }

    fn queue(&self, index: usize) -> Option<Vst3ParamQueue<'_>> {
        let index = i32::try_from(index).ok()?;
        // SAFETY: queues returned by the host live as long as the changes.
        unsafe { ComRef::from_raw(self.changes.getParameterData(index)).map(Vst3ParamQueue::new) }
    }
}

/// Automation points of one parameter.
pub struct Vst3ParamQueue<'a> {
    queue: ComRef<'a, IParamValueQueue>,
}

impl<'a> Vst3ParamQueue<'a> {
    pub fn new(queue: ComRef<'a, IParamValueQueue>) -> Self {
        Self { queue }
    }
}

impl HostParameterQueue for Vst3ParamQueue<'_> {
    fn parameter_id(&self) -> ParameterId {
        // SAFETY: see `Vst3ParameterChanges::queue`.
        unsafe { self.queue.getParameterId() }
    }

    fn point_count(&self) -> usize {
        let count = unsafe { self.queue.getPointCount() };
        count.max(0) as usize
    }

    fn point(&self, index: usize) -> Option<HostPoint> {
        let index = i32::try_from(index).ok()?;
        let mut sample_offset = 0;
        let mut value = 0.0;
        let result = unsafe { self.queue.getPoint(index, &mut sample_offset, &mut value) };
        (result == kResultOk).then_some(HostPoint {
            sample_offset,
            value,
        })
    }
}
