use super::evolution_engine::ProgressCallback;

/// Reports run progress through the `log` facade.
pub struct LoggingProgress {
    label: String,
}

impl LoggingProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl ProgressCallback for LoggingProgress {
    fn on_seeded(&mut self, population_size: usize) {
        log::info!("[{}] Seeded population of {}", self.label, population_size);
    }

    fn on_generation_start(&mut self, generation: usize) {
        log::info!("[{}] Generation {} starting...", self.label, generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, expanded_size: usize, survivors: usize) {
        log::info!(
            "[{}] Generation {} complete. Expanded pool: {}, survivors: {}",
            self.label,
            generation + 1,
            expanded_size,
            survivors
        );
    }
}

/// Ignores all progress events.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_seeded(&mut self, _population_size: usize) {}
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _expanded_size: usize, _survivors: usize) {}
}
