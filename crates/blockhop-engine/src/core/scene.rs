use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Everything spawned by one bake. A level holds a few hundred objects at
/// most, so lookups scan. Despawning does not keep spawn order.
#[derive(Default)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let at = self.index_of(id)?;
        Some(self.entities.swap_remove(at))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|at| &self.entities[at])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let at = self.index_of(id)?;
        Some(&mut self.entities[at])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    /// Entities of one kind, e.g. every `"bullet"`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }
}
