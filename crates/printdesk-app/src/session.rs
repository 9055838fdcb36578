//! An editing session: editor, surface and synchronizer wired together.

use crate::script::{Step, parse_combo};
use printdesk_canvas::{
    CanvasSync, ImageCompletion, MemorySurface, PrimitiveTag, SurfaceEvent, SyncEffect,
    decode_image,
};
use printdesk_core::{DesignState, Dispatch, Editor, EditorConfig};

/// Counters collected while replaying a script.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub steps: usize,
    pub committed: usize,
    pub ignored: usize,
    pub passes: usize,
    pub images_loaded: usize,
    pub images_failed: usize,
}

/// A headless editing session drawing onto a [`MemorySurface`].
pub struct Session {
    editor: Editor,
    surface: MemorySurface,
    sync: CanvasSync,
    stats: SessionStats,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(DesignState::default(), config)
    }

    pub fn with_state(state: DesignState, config: EditorConfig) -> Self {
        let mut session = Self {
            editor: Editor::with_state(state, config),
            surface: MemorySurface::new(),
            sync: CanvasSync::new(),
            stats: SessionStats::default(),
        };
        session.resync();
        session
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Bring the surface up to date, loading images synchronously.
    pub fn resync(&mut self) {
        let Some(report) = self.sync.sync(&mut self.surface, &self.editor) else {
            return;
        };
        self.stats.passes += 1;

        for request in &report.requests {
            let result = decode_image(&request.src);
            match self
                .sync
                .complete_image(&mut self.surface, self.editor.present(), request, result)
            {
                ImageCompletion::Applied => self.stats.images_loaded += 1,
                ImageCompletion::Failed => self.stats.images_failed += 1,
                ImageCompletion::Stale => {}
            }
        }
    }

    fn record(&mut self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Committed => self.stats.committed += 1,
            Dispatch::Previewed => {}
            Dispatch::Ignored(reason) => {
                log::debug!("Step ignored: {}", reason);
                self.stats.ignored += 1;
            }
        }
    }

    /// Replay one scripted step and resync the surface.
    pub fn apply(&mut self, step: &Step) {
        self.stats.steps += 1;
        match step {
            Step::Dispatch { action } => {
                let dispatch = self.editor.dispatch(action);
                self.record(dispatch);
            }
            Step::Preview { action } => {
                let dispatch = self.editor.preview(action);
                self.record(dispatch);
            }
            Step::BeginGesture => self.editor.begin_gesture(),
            Step::EndGesture => {
                if self.editor.end_gesture() {
                    self.stats.committed += 1;
                }
            }
            Step::CancelGesture => self.editor.cancel_gesture(),
            Step::Undo => {
                if !self.editor.undo() {
                    log::debug!("Nothing to undo");
                }
            }
            Step::Redo => {
                if !self.editor.redo() {
                    log::debug!("Nothing to redo");
                }
            }
            Step::Select { ids } => {
                let tags = ids.iter().cloned().map(PrimitiveTag::Object).collect();
                let event = SurfaceEvent::SelectionCreated(tags);
                self.sync
                    .handle_event(&mut self.editor, &mut self.surface, event);
            }
            Step::Press { keys } => match parse_combo(keys) {
                Some(combo) => {
                    let event = SurfaceEvent::Key(combo);
                    let effect = self
                        .sync
                        .handle_event(&mut self.editor, &mut self.surface, event);
                    if effect == SyncEffect::Resync {
                        log::debug!("{} changed the design", keys);
                    }
                }
                None => log::warn!("Unrecognized key combination: {}", keys),
            },
        }
        self.resync();
    }

    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.apply(step);
        }
    }
}
