//! Model loading and unloading

use serde_json::json;

use super::{LoadCallback, PendingLoad, Viewer, event};
use crate::engine::{LoadCompletion, LoadTicket, SceneEngine};
use crate::error::{ViewerError, ViewerResult};
use crate::registry::{Destroyed, Model, Object};

impl<E: SceneEngine> Viewer<E> {
    /// Register a model and start loading it.
    ///
    /// The id is claimed immediately, so a duplicate fails here rather than
    /// when the load completes. Objects appear on a later `tick`.
    pub fn load_model(&mut self, id: &str, src: &str) -> ViewerResult<()> {
        self.start_load(id, src, None)
    }

    /// Like [`Viewer::load_model`], calling `on_loaded` once the load settles
    pub fn load_model_then(
        &mut self,
        id: &str,
        src: &str,
        on_loaded: impl FnOnce(&mut Viewer<E>, ViewerResult<String>) + 'static,
    ) -> ViewerResult<()> {
        self.start_load(id, src, Some(Box::new(on_loaded)))
    }

    fn start_load(
        &mut self,
        id: &str,
        src: &str,
        on_loaded: Option<LoadCallback<E>>,
    ) -> ViewerResult<()> {
        self.scene.registry.register_model(Model::new(id, src))?;
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_loads
            .insert(id.to_string(), PendingLoad { ticket, on_loaded });
        tracing::info!("Loading model '{}' from {}", id, src);
        self.engine.begin_load(ticket, id, src);
        Ok(())
    }

    /// Whether a model's load has completed successfully
    pub fn is_loaded(&self, id: &str) -> bool {
        self.scene
            .registry
            .model_key(id)
            .ok()
            .and_then(|k| self.scene.registry.model(k))
            .is_some_and(|m| m.loaded)
    }

    /// Number of loads issued and not yet completed
    pub fn loads_in_flight(&self) -> usize {
        self.pending_loads.len()
    }

    pub(crate) fn drain_loads(&mut self) {
        for completion in self.engine.poll_loads() {
            self.finish_load(completion);
        }
    }

    fn finish_load(&mut self, completion: LoadCompletion) {
        let LoadCompletion {
            ticket,
            model_id,
            result,
        } = completion;
        // A completion from a load that was unloaded, possibly replaced by a
        // newer load of the same id, is ignored
        if self.pending_loads.get(&model_id).map(|p| p.ticket) != Some(ticket) {
            tracing::debug!("Dropping stale load completion for '{}'", model_id);
            return;
        }
        let callback = self
            .pending_loads
            .remove(&model_id)
            .and_then(|pending| pending.on_loaded);
        let Ok(model_key) = self.scene.registry.model_key(&model_id) else {
            tracing::debug!("Model '{}' went away before its load completed", model_id);
            return;
        };

        let outcome = match result {
            Ok(parsed) => {
                let count = parsed.objects.len();
                for parsed_object in parsed.objects {
                    let object_id = format!("{}#{}", model_id, parsed_object.local_id);
                    let object = Object::from_parsed(object_id, model_key, parsed_object);
                    if let Err(e) = self.scene.registry.register_object(object) {
                        tracing::warn!("Skipping object of '{}': {}", model_id, e);
                    }
                }
                if let Some(model) = self.scene.registry.model_mut(model_key) {
                    model.loaded = true;
                }
                tracing::info!("Loaded model '{}' ({} objects)", model_id, count);
                self.events
                    .fire(event::LOADED_MODEL, &json!({ "id": model_id }));
                Ok(model_id)
            }
            Err(reason) => {
                tracing::warn!("Failed to load model '{}': {}", model_id, reason);
                if let Ok(report) = self.scene.destroy(&model_id) {
                    self.after_destroy(&report);
                }
                self.events.fire(
                    event::LOAD_FAILED,
                    &json!({ "id": model_id, "reason": reason }),
                );
                Err(ViewerError::Load {
                    model: model_id,
                    reason,
                })
            }
        };

        if let Some(callback) = callback {
            callback(self, outcome);
        }
    }

    /// Destroy a model with its objects and their annotations
    pub fn unload_model(&mut self, id: &str) -> ViewerResult<Destroyed> {
        self.scene.registry.model_key(id)?;
        self.pending_loads.remove(id);
        let report = self.scene.destroy(id)?;
        self.after_destroy(&report);
        self.engine.unload(id);
        tracing::info!("Unloaded model '{}'", id);
        self.events.fire(event::UNLOADED_MODEL, &json!({ "id": id }));
        Ok(report)
    }
}
