/// Handle returned by [`PluginQueue::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId(u64);

struct Plugin {
    name: String,
    enabled: bool,
    func: Box<dyn FnMut(f64)>,
}

/// Callbacks run at the end of every tick with the tick timestamp in seconds.
#[derive(Default)]
pub struct PluginQueue {
    plugins: Vec<(PluginId, Plugin)>,
    next_id: u64,
}

impl PluginQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, func: impl FnMut(f64) + 'static) -> PluginId {
        let id = PluginId(self.next_id);
        self.next_id += 1;
        let name = name.into();
        tracing::debug!(plugin = %name, "plugin registered");
        self.plugins.push((
            id,
            Plugin {
                name,
                enabled: true,
                func: Box::new(func),
            },
        ));
        id
    }

    pub fn remove(&mut self, id: PluginId) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|(pid, _)| *pid != id);
        self.plugins.len() != before
    }

    /// Returns false for unknown ids.
    pub fn set_enabled(&mut self, id: PluginId, enabled: bool) -> bool {
        match self.plugins.iter_mut().find(|(pid, _)| *pid == id) {
            Some((_, plugin)) => {
                plugin.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, id: PluginId) -> Option<bool> {
        self.plugins
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, p)| p.enabled)
    }

    /// Invoke every enabled plugin in registration order. Returns how many ran.
    pub fn run(&mut self, timestamp: f64) -> usize {
        let mut ran = 0;
        for (_, plugin) in self.plugins.iter_mut().filter(|(_, p)| p.enabled) {
            tracing::trace!(plugin = %plugin.name, timestamp, "plugin run");
            (plugin.func)(timestamp);
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|(_, p)| (&p.name, p.enabled)))
            .finish()
    }
}
