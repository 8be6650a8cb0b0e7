//! Scene object arena
//!
//! Owns every `SceneObject` and hands out `ObjectId` handles. A handle carries
//! the generation of its slot, so ids of removed objects stop resolving
//! instead of pointing at whatever reuses the slot. The current selection is
//! stored here as an optional handle.

use super::SceneObject;

/// Stable handle to an object in a `SceneArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    /// Slot index (for display only, not stable across removals)
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

/// Arena of scene objects with a single optional selection
#[derive(Debug, Clone, Default)]
pub struct SceneArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    selected: Option<ObjectId>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, reusing a free slot when one exists
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            return ObjectId { index, generation: slot.generation };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, object: Some(object) });
        ObjectId { index, generation: 0 }
    }

    /// Remove an object. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let slot = self.slot_mut(id)?;
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;

        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slot_mut(id).and_then(|slot| slot.object.as_mut())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live objects in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.object.as_ref().map(|object| {
                (ObjectId { index: index as u32, generation: slot.generation }, object)
            })
        })
    }

    /// First object with the given name
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, obj)| obj.name == name).map(|(id, _)| id)
    }

    /// Current selection, or None if nothing (or a removed object) is selected
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected.filter(|id| self.contains(*id))
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected().and_then(|id| self.get(id))
    }

    pub fn selected_object_mut(&mut self) -> Option<&mut SceneObject> {
        let id = self.selected()?;
        self.get_mut(id)
    }

    /// Set the selection. Stale ids select nothing.
    /// Returns true if the selection changed.
    pub fn select(&mut self, id: Option<ObjectId>) -> bool {
        let id = id.filter(|id| self.contains(*id));
        let changed = self.selected() != id;
        self.selected = id;
        changed
    }

    /// Select the object after the current one (wrapping), or the first one
    pub fn select_next(&mut self) -> Option<ObjectId> {
        let ids: Vec<ObjectId> = self.iter().map(|(id, _)| id).collect();
        let next = match self.selected().and_then(|cur| ids.iter().position(|id| *id == cur)) {
            Some(pos) => ids.get((pos + 1) % ids.len()).copied(),
            None => ids.first().copied(),
        };
        self.select(next);
        next
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
    }
}

impl FromIterator<SceneObject> for SceneArena {
    fn from_iter<T: IntoIterator<Item = SceneObject>>(iter: T) -> Self {
        let mut arena = SceneArena::new();
        for object in iter {
            arena.insert(object);
        }
        arena
    }
}
