use tandem_common::ObjectId;
use tandem_physics::BodyHandle;
use tandem_scene::Mixer;

/// What a scene node is paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    Physics(BodyHandle),
    VisualOnly,
}

/// One object tracked by the frame loop.
#[derive(Debug)]
pub struct ModellingEntry {
    pub object: ObjectId,
    pub pairing: Pairing,
    /// Suspends physics sync without unpairing.
    pub skip: bool,
    pub mixer: Option<Box<dyn Mixer>>,
}

impl ModellingEntry {
    pub fn new(object: ObjectId, pairing: Pairing) -> Self {
        Self {
            object,
            pairing,
            skip: false,
            mixer: None,
        }
    }

    pub fn body(&self) -> Option<BodyHandle> {
        match self.pairing {
            Pairing::Physics(handle) => Some(handle),
            Pairing::VisualOnly => None,
        }
    }

    pub fn has_body(&self) -> bool {
        self.body().is_some()
    }

    pub fn has_morph(&self) -> bool {
        self.mixer.is_some()
    }

    pub fn only_visual(&self) -> bool {
        self.pairing == Pairing::VisualOnly
    }

    /// Whether the sync step overwrites this entry's node from its body.
    pub fn syncs(&self) -> bool {
        self.has_body() && !self.skip
    }
}

/// Queue entries in insertion order.
#[derive(Debug, Default)]
pub struct ModellingQueue {
    entries: Vec<ModellingEntry>,
}

impl ModellingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ModellingEntry) {
        tracing::debug!(
            object = %entry.object.short(),
            pairing = ?entry.pairing,
            "modelling entry queued"
        );
        self.entries.push(entry);
    }

    pub fn remove(&mut self, object: ObjectId) -> Option<ModellingEntry> {
        let index = self.entries.iter().position(|e| e.object == object)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, object: ObjectId) -> Option<&ModellingEntry> {
        self.entries.iter().find(|e| e.object == object)
    }

    pub fn get_mut(&mut self, object: ObjectId) -> Option<&mut ModellingEntry> {
        self.entries.iter_mut().find(|e| e.object == object)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModellingEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModellingEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
