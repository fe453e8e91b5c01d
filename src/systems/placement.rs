//! ObjectPlacement - aim a position marker on detected planes and spawn an
//! anchored object there
//!
//! Flow: `start_placement` → aim (`on_aim` with the raycast hits under the
//! pointer) → `place_object`. Only one object is spawned per component.

use glam::Vec3;
use serde::Serialize;

use crate::core::{log, look_rotation, project_on_plane, Pose};
use crate::domain::EventSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PlaneId(pub u32);

/// Handle of an object spawned through the anchor manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectHandle(pub u32);

/// One raycast result under the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    pub distance: f32,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    /// Origin of the ray (camera position)
    pub ray_origin: Vec3,
    /// Set when the hit object is a tracked plane
    pub plane: Option<PlaneId>,
}

/// Creates anchors on planes and instantiates the placed object
pub trait AnchorManager {
    fn attach_anchor(&mut self, plane: PlaneId, pose: Pose) -> Option<ObjectHandle>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "object", rename_all = "camelCase")]
pub enum PlacementEvent {
    PlacementStarted,
    PlacementEnded,
    MarkerPlaced,
    ObjectSpawned(ObjectHandle),
}

pub struct ObjectPlacement {
    anchors: Option<Box<dyn AnchorManager>>,
    placement_active: bool,
    marker: Option<Pose>,
    last_plane: Option<PlaneId>,
    spawned: Option<ObjectHandle>,
    events: Option<Box<dyn EventSink<PlacementEvent>>>,
}

impl ObjectPlacement {
    pub fn new() -> Self {
        Self {
            anchors: None,
            placement_active: false,
            marker: None,
            last_plane: None,
            spawned: None,
            events: None,
        }
    }

    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink<PlacementEvent>>>) {
        self.events = sink;
    }

    /// Hook up the anchor manager. Without one, aiming still works but
    /// objects cannot be placed.
    pub fn start(&mut self, anchors: Option<Box<dyn AnchorManager>>) {
        if anchors.is_none() {
            log::warn("No anchor manager found: objects cannot be placed");
        }
        self.anchors = anchors;
        self.placement_active = false;
        self.marker = None;
        self.last_plane = None;
        self.spawned = None;
    }

    pub fn start_placement(&mut self) {
        if !self.placement_active {
            self.remove_marker();
            self.placement_active = true;
            self.emit(PlacementEvent::PlacementStarted);
        }
    }

    pub fn end_placement(&mut self) {
        if self.placement_active {
            self.remove_marker();
            self.placement_active = false;
            self.emit(PlacementEvent::PlacementEnded);
        }
    }

    pub fn remove_marker(&mut self) {
        self.marker = None;
    }

    /// Move the marker to the closest hit, if that hit is a plane.
    ///
    /// Ignored when placement is inactive or an object was already spawned.
    pub fn on_aim(&mut self, hits: &[RaycastHit]) {
        if !self.placement_active || self.spawned.is_some() {
            return;
        }

        let closest = hits
            .iter()
            .filter(|h| h.distance.is_finite())
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        let Some(hit) = closest else {
            return;
        };
        let Some(plane) = hit.plane else {
            return;
        };

        let ray_dir = (hit.world_position - hit.ray_origin).normalize_or_zero();
        let forward = project_on_plane(ray_dir, hit.world_normal).normalize_or_zero();
        let pose = Pose::new(hit.world_position, look_rotation(forward, hit.world_normal));

        let first = self.marker.is_none();
        self.marker = Some(pose);
        self.last_plane = Some(plane);
        if first {
            self.emit(PlacementEvent::MarkerPlaced);
        }
    }

    /// Spawn the object at the marker. Returns the spawned handle.
    pub fn place_object(&mut self) -> Option<ObjectHandle> {
        if !self.placement_active || self.spawned.is_some() {
            return None;
        }
        let (Some(marker), Some(plane)) = (self.marker, self.last_plane) else {
            return None;
        };
        let anchors = self.anchors.as_mut()?;

        log::info("Placing object");
        let Some(object) = anchors.attach_anchor(plane, marker) else {
            log::warn("Anchor manager failed to attach an anchor");
            return None;
        };

        self.spawned = Some(object);
        self.marker = None;
        self.emit(PlacementEvent::ObjectSpawned(object));
        Some(object)
    }

    fn emit(&mut self, event: PlacementEvent) {
        if let Some(sink) = self.events.as_mut() {
            sink.emit(event);
        }
    }

    pub fn is_placement_active(&self) -> bool {
        self.placement_active
    }

    pub fn marker(&self) -> Option<Pose> {
        self.marker
    }

    pub fn spawned_object(&self) -> Option<ObjectHandle> {
        self.spawned
    }
}

impl Default for ObjectPlacement {
    fn default() -> Self {
        Self::new()
    }
}
