//! Visual container seam: where fragment surfaces are inserted and removed.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::fragment::Fragment;
use crate::geom::{BoundingBox, Point};
use crate::ids::FragmentId;
use crate::surface::Surface;

/// A parent container that displays fragment surfaces.
pub trait Stage {
    /// Insert the fragment's surface at its own origin with the given stacking order.
    fn attach(&mut self, fragment: &Fragment, z_index: u32);
    /// Remove a previously attached surface. Unknown ids are ignored.
    fn detach(&mut self, id: FragmentId);
}

/// Layer description without pixel data, for adapters that draw the outline themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub id: FragmentId,
    pub bbox: BoundingBox,
    /// Top-left of the pixel surface, which may be clipped inside `bbox`.
    pub origin: Point,
    pub width: u32,
    pub height: u32,
    pub z_index: u32,
    pub outline: [Point; 3],
    pub color: String,
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub id: FragmentId,
    pub bbox: BoundingBox,
    pub z_index: u32,
    pub outline: [Point; 3],
    pub surface: Surface,
    pub color: String,
}

impl Layer {
    pub fn info(&self) -> LayerInfo {
        LayerInfo {
            id: self.id,
            bbox: self.bbox,
            origin: self.surface.origin(),
            width: self.surface.width(),
            height: self.surface.height(),
            z_index: self.z_index,
            outline: self.outline,
            color: self.color.clone(),
        }
    }
}

/// In-memory stage keeping a copy of every attached surface.
#[derive(Debug, Default)]
pub struct DisplayList {
    layers: HashMap<FragmentId, Layer>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: FragmentId) -> bool {
        self.layers.contains_key(&id)
    }

    pub fn get(&self, id: FragmentId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Layers back to front (ascending z-index, ties broken by id).
    pub fn layers_by_depth(&self) -> Vec<&Layer> {
        let mut out: Vec<&Layer> = self.layers.values().collect();
        out.sort_by_key(|l| (l.z_index, l.id));
        out
    }

    pub fn ids(&self) -> Vec<FragmentId> {
        let mut ids: Vec<FragmentId> = self.layers.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Stage for DisplayList {
    fn attach(&mut self, fragment: &Fragment, z_index: u32) {
        self.layers.insert(
            fragment.id,
            Layer {
                id: fragment.id,
                bbox: fragment.bbox,
                z_index,
                outline: fragment.vertices,
                surface: fragment.surface().clone(),
                color: fragment.color.to_hex(),
            },
        );
    }

    fn detach(&mut self, id: FragmentId) {
        self.layers.remove(&id);
    }
}
