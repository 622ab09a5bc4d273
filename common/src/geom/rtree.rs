use super::rect::Rect;
use rstar::{AABB, RTree, RTreeObject};

/// Rectangle index keyed by an integer id, queried per layer.
#[derive(Default)]
pub struct ObstacleIndex {
    tree: RTree<IndexedRect>,
}

struct IndexedRect {
    rect: Rect,
    layer: i32,
    id: usize,
}

impl RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.min_x, self.rect.min_y],
            [self.rect.max_x, self.rect.max_y],
        )
    }
}

impl ObstacleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rect: Rect, layer: i32, id: usize) {
        self.tree.insert(IndexedRect { rect, layer, id });
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of rectangles on `layer` touching `area`, sorted ascending.
    pub fn query(&self, area: Rect, layer: i32) -> Vec<usize> {
        let aabb = AABB::from_corners([area.min_x, area.min_y], [area.max_x, area.max_y]);
        let mut ids: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .filter(|item| item.layer == layer)
            .map(|item| item.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
