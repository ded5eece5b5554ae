//! Generational storage for consumers that live outside an ECS world.

use glam::Vec3;

use crate::consumer::{ConsumerStore, LodConsumer};

/// Handle to a consumer in a [`ConsumerArena`].
///
/// The generation makes handles to despawned consumers permanently stale,
/// even after their slot has been reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConsumerId {
    index: u32,
    generation: u32,
}

impl ConsumerId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<C> {
    generation: u32,
    value: Option<C>,
}

/// Slot arena of consumers addressed by [`ConsumerId`].
#[derive(Debug)]
pub struct ConsumerArena<C> {
    slots: Vec<Slot<C>>,
    free: Vec<u32>,
    len: usize,
}

impl<C> Default for ConsumerArena<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ConsumerArena<C> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert a consumer, reusing a freed slot when one is available.
    pub fn spawn(&mut self, consumer: C) -> ConsumerId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(consumer);
            return ConsumerId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(consumer),
        });
        ConsumerId {
            index,
            generation: 0,
        }
    }

    /// Remove a consumer. Returns `None` if `id` is already stale.
    pub fn despawn(&mut self, id: ConsumerId) -> Option<C> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: ConsumerId) -> Option<&C> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: ConsumerId) -> Option<&mut C> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: ConsumerId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live consumers.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate live consumers with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ConsumerId, &C)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    ConsumerId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Iterate live consumers mutably with their handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ConsumerId, &mut C)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.value.as_mut().map(|value| {
                    (
                        ConsumerId {
                            index: index as u32,
                            generation,
                        },
                        value,
                    )
                })
            })
    }
}

impl<C: LodConsumer> ConsumerStore<ConsumerId> for ConsumerArena<C> {
    fn position(&self, handle: ConsumerId) -> Option<Vec3> {
        self.get(handle).map(|consumer| consumer.position())
    }

    fn set_close(&mut self, handle: ConsumerId, close: bool) {
        if let Some(consumer) = self.get_mut(handle) {
            consumer.set_close(close);
        }
    }

    fn set_very_far(&mut self, handle: ConsumerId, very_far: bool) {
        if let Some(consumer) = self.get_mut(handle) {
            consumer.set_very_far(very_far);
        }
    }
}
