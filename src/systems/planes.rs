//! PlaneManagerEvents - report plane-count transitions and toggle plane
//! visibility
//!
//! The tracking subsystem flags changes via `on_planes_changed`; the count is
//! only compared on the next `update`, so bursts of changes within one frame
//! produce at most one event.

use serde::Serialize;

use crate::domain::EventSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "camelCase")]
pub enum PlaneEvent {
    NoPlanesDetected,
    PlanesDetected(usize),
}

/// Scene-side state of one tracked plane.
///
/// `visualizer` / `collider` are `None` when the plane object has no such
/// component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedPlane {
    pub id: u32,
    pub active: bool,
    pub visualizer: Option<bool>,
    pub collider: Option<bool>,
}

impl TrackedPlane {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            active: true,
            visualizer: Some(true),
            collider: Some(true),
        }
    }
}

pub struct PlaneManagerEvents {
    detection_enabled: bool,
    /// Last reported count (None = nothing reported yet)
    plane_count: Option<usize>,
    has_changed: bool,
    events: Option<Box<dyn EventSink<PlaneEvent>>>,
}

impl PlaneManagerEvents {
    pub fn new() -> Self {
        Self {
            detection_enabled: true,
            plane_count: None,
            has_changed: true,
            events: None,
        }
    }

    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink<PlaneEvent>>>) {
        self.events = sink;
    }

    /// Forget the last count so the next update always reports
    pub fn start(&mut self) {
        self.plane_count = None;
        self.has_changed = true;
    }

    pub fn on_planes_changed(&mut self) {
        self.has_changed = true;
    }

    /// Per frame: compare the current plane count against the last report
    pub fn update(&mut self, plane_count: usize) -> Option<PlaneEvent> {
        if !self.has_changed {
            return None;
        }
        self.has_changed = false;

        if self.plane_count == Some(plane_count) {
            return None;
        }
        self.plane_count = Some(plane_count);

        let event = if plane_count > 0 {
            PlaneEvent::PlanesDetected(plane_count)
        } else {
            PlaneEvent::NoPlanesDetected
        };
        if let Some(sink) = self.events.as_mut() {
            sink.emit(event);
        }
        Some(event)
    }

    pub fn plane_count(&self) -> Option<usize> {
        self.plane_count
    }

    pub fn start_detection(&mut self) {
        self.detection_enabled = true;
    }

    pub fn stop_detection(&mut self) {
        self.detection_enabled = false;
    }

    pub fn is_detecting(&self) -> bool {
        self.detection_enabled
    }

    /// Stop rendering planes; colliders keep working
    pub fn hide_all_planes(&self, planes: &mut [TrackedPlane]) {
        for plane in planes.iter_mut() {
            if let Some(visible) = plane.visualizer.as_mut() {
                *visible = false;
            }
        }
    }

    /// Deactivate plane objects entirely
    pub fn disable_all_planes(&self, planes: &mut [TrackedPlane]) {
        for plane in planes.iter_mut() {
            plane.active = false;
        }
    }

    pub fn show_all_planes(&self, planes: &mut [TrackedPlane]) {
        for plane in planes.iter_mut() {
            if let Some(visible) = plane.visualizer.as_mut() {
                *visible = true;
                if let Some(collider) = plane.collider.as_mut() {
                    *collider = true;
                }
            }
            plane.active = true;
        }
    }
}

impl Default for PlaneManagerEvents {
    fn default() -> Self {
        Self::new()
    }
}
