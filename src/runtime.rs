use std::time::Instant;

use crate::config::LoaderConfig;
use crate::error::LoaderResult;
use crate::input::HotkeyTrigger;
use crate::services::{BundleService, SceneService};
use crate::workflow::{LoadWorkflow, WorkflowState};

/// Host-facing driver
///
/// Owns the hotkey latch and the load workflow and exposes a single
/// per-frame entry point. The host calls [`SceneLoaderRuntime::update`]
/// periodically with its current time and raw hotkey state; everything
/// else happens inside.
pub struct SceneLoaderRuntime<B: BundleService, S: SceneService> {
    hotkey: HotkeyTrigger,
    workflow: LoadWorkflow<B, S>,
}

impl<B: BundleService, S: SceneService> SceneLoaderRuntime<B, S> {
    /// Create the runtime over the host's services. Validates the
    /// configuration up front.
    pub fn new(config: LoaderConfig, bundles: B, scenes: S) -> LoaderResult<Self> {
        config.validate()?;
        log::info!(
            "scene loader ready, press the load hotkey to load a .{} file from {}",
            config.bundle_extension,
            config.bundles_dir.display()
        );
        Ok(Self {
            hotkey: HotkeyTrigger::new(config.hotkey_check_interval()),
            workflow: LoadWorkflow::new(&config, bundles, scenes),
        })
    }

    /// Per-frame entry point. Advances any in-flight load by one step,
    /// then samples the hotkey and triggers a new load on a key-down
    /// transition. Never blocks.
    pub fn update(&mut self, now: Instant, hotkey_pressed: bool) {
        self.workflow.tick(now);

        if self.hotkey.poll(now, hotkey_pressed) {
            self.workflow.trigger();
        }
    }

    /// Trigger a load without the hotkey (console command, menu entry).
    /// Ignored while a load is already in flight.
    pub fn force_load(&mut self) -> bool {
        self.workflow.trigger()
    }

    /// Current workflow state
    pub fn state(&self) -> WorkflowState {
        self.workflow.state()
    }

    /// The underlying workflow, for state inspection
    pub fn workflow(&self) -> &LoadWorkflow<B, S> {
        &self.workflow
    }
}
