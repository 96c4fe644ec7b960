use std::fmt;
use std::sync::Arc;

use lang_core::model::{ActivitySettings, LessonIndex, MiniGameKind};
use lang_core::{Locale, LocaleSetting};
use storage::repository::{ProgressStore, Storage};

use crate::catalog::LessonCatalog;
use crate::error::ActivityError;
use crate::resolver::{DatasetResolver, ResolutionTier};
use crate::sessions::{
    ActivityView, LevelSession, MenuEntry, MenuView, MiniGame, MiniGameSequencer, ProgressTracker,
    SequencerStep, SessionPhase, SubItemStep, ViewSink,
};
use crate::shuffle::Shuffler;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Everything an `ActivityController` is bound to at init.
pub struct ActivityConfig {
    settings: ActivitySettings,
    resolver: DatasetResolver,
    store: Arc<dyn ProgressStore>,
    sink: Box<dyn ViewSink>,
    sequencer: MiniGameSequencer,
    shuffler: Shuffler,
    system_locale: Option<Locale>,
}

impl ActivityConfig {
    #[must_use]
    pub fn new(settings: ActivitySettings, storage: &Storage, sink: Box<dyn ViewSink>) -> Self {
        let resolver = DatasetResolver::new(
            Arc::clone(&storage.datasets),
            settings.default_locale().clone(),
        );
        let sequencer = MiniGameSequencer::new(settings.pipeline().clone());
        Self {
            settings,
            resolver,
            store: Arc::clone(&storage.progress),
            sink,
            sequencer,
            shuffler: Shuffler::random(),
            system_locale: None,
        }
    }

    #[must_use]
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    /// Locale used when the settings ask for the system one.
    #[must_use]
    pub fn with_system_locale(mut self, locale: Option<Locale>) -> Self {
        self.system_locale = locale;
        self
    }

    #[must_use]
    pub fn with_mini_game(mut self, kind: MiniGameKind, game: Box<dyn MiniGame>) -> Self {
        self.sequencer.register(kind, game);
        self
    }

    #[must_use]
    pub fn with_progress_store(mut self, store: Arc<dyn ProgressStore>) -> Self {
        self.store = store;
        self
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Catalog loaded by the last successful `start`.
struct Loaded {
    catalog: LessonCatalog,
    tier: ResolutionTier,
}

/// Owns every piece of activity state and routes host and mini-game events.
///
/// Lifecycle: `init` → `start` (menu) → lessons and mini-games → `stop`.
pub struct ActivityController {
    settings: ActivitySettings,
    resolver: DatasetResolver,
    store: Arc<dyn ProgressStore>,
    sink: Box<dyn ViewSink>,
    sequencer: MiniGameSequencer,
    shuffler: Shuffler,
    system_locale: Option<Locale>,
    progress: ProgressTracker,
    loaded: Option<Loaded>,
    session: Option<LevelSession>,
}

impl ActivityController {
    #[must_use]
    pub fn init(config: ActivityConfig) -> Self {
        Self {
            settings: config.settings,
            resolver: config.resolver,
            store: config.store,
            sink: config.sink,
            sequencer: config.sequencer,
            shuffler: config.shuffler,
            system_locale: config.system_locale,
            progress: ProgressTracker::new(),
            loaded: None,
            session: None,
        }
    }

    /// Resolve the dataset for the configured locale and show the menu.
    ///
    /// Calling it again reloads the dataset; any active lesson is committed
    /// and closed once the new dataset is in hand. On error the controller
    /// is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::MissingMiniGame` if a pipeline stage has no
    /// collaborator, `ActivityError::Resolve` if no dataset can be found and
    /// `ActivityError::Storage` if saved progress cannot be read.
    pub fn start(&mut self) -> Result<(), ActivityError> {
        if let Some(kind) = self.sequencer.missing_kinds().into_iter().next() {
            return Err(ActivityError::MissingMiniGame(kind));
        }

        let requested = self
            .settings
            .locale()
            .resolve(self.system_locale.as_ref(), self.settings.default_locale());
        let resolved = self.resolver.resolve(&requested)?;
        let saved = self.store.load_best()?;

        self.close_session();
        for (lesson, best) in saved {
            self.progress.seed(lesson, best);
        }

        let catalog = LessonCatalog::from_dataset(&resolved.dataset);
        tracing::info!(
            %requested,
            locale = %catalog.locale(),
            tier = ?resolved.tier,
            lessons = catalog.len(),
            "activity started"
        );
        self.loaded = Some(Loaded {
            catalog,
            tier: resolved.tier,
        });
        self.show_menu()
    }

    /// Commit progress, drop the catalog and notify the host.
    pub fn stop(&mut self) {
        if self.loaded.is_none() {
            tracing::debug!("stop called on an activity that is not running");
            return;
        }
        self.close_session();
        self.loaded = None;
        tracing::info!("activity stopped");
        self.sink.show(ActivityView::Stopped);
    }

    /// Switch language. A running activity reloads and returns to the menu;
    /// progress is kept by lesson position.
    ///
    /// # Errors
    ///
    /// Same as `start` when the activity is running. A failed reload keeps
    /// the previous locale setting and the current lesson.
    pub fn set_locale(&mut self, locale: LocaleSetting) -> Result<(), ActivityError> {
        tracing::info!(%locale, "locale changed");
        let previous = self.settings.locale().clone();
        self.settings.set_locale(locale);
        if self.loaded.is_none() {
            return Ok(());
        }
        if let Err(err) = self.start() {
            tracing::warn!(restored = %previous, error = %err, "locale change failed");
            self.settings.set_locale(previous);
            return Err(err);
        }
        Ok(())
    }

    /// Enter the lesson at `raw`, wrapped into range.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` before `start` or after `stop`.
    pub fn enter_lesson(&mut self, raw: isize) -> Result<(), ActivityError> {
        let index = self.catalog_ref()?.wrap(raw);
        self.enter_index(index)
    }

    /// Commit progress and enter the following lesson, wrapping to the first.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` or `ActivityError::NoActiveLesson`.
    pub fn next_lesson(&mut self) -> Result<(), ActivityError> {
        let count = self.catalog_ref()?.len();
        let current = self.active_session()?.lesson_index();
        self.enter_index(current.next(count))
    }

    /// Commit progress and enter the preceding lesson, wrapping to the last.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` or `ActivityError::NoActiveLesson`.
    pub fn previous_lesson(&mut self) -> Result<(), ActivityError> {
        let count = self.catalog_ref()?.len();
        let current = self.active_session()?.lesson_index();
        self.enter_index(current.previous(count))
    }

    /// Show the next word; after the last word, start the mini-games.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted`, `ActivityError::NoActiveLesson` or
    /// `ActivityError::MissingMiniGame`.
    pub fn advance_sub_item(&mut self) -> Result<SubItemStep, ActivityError> {
        self.catalog_ref()?;
        let session = self.session.as_mut().ok_or(ActivityError::NoActiveLesson)?;
        let step = session.advance_sub_item(&mut self.progress);
        let lesson = session.lesson_index();
        match step {
            SubItemStep::Show => self.show_sub_item(),
            SubItemStep::PipelineReady { new_best } => {
                if let Some(best) = new_best {
                    self.persist(lesson, best);
                }
                self.run_pipeline()?;
            }
            SubItemStep::Ignored => {
                tracing::debug!(%lesson, "advance ignored outside word traversal");
            }
        }
        Ok(step)
    }

    /// Show the previous word. A no-op on the first word.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` or `ActivityError::NoActiveLesson`.
    pub fn retreat_sub_item(&mut self) -> Result<SubItemStep, ActivityError> {
        self.catalog_ref()?;
        let session = self.session.as_mut().ok_or(ActivityError::NoActiveLesson)?;
        let step = session.retreat_sub_item(&mut self.progress);
        if step == SubItemStep::Show {
            self.show_sub_item();
        }
        Ok(step)
    }

    /// A mini-game reports its stage as won; dispatch the next stage or move
    /// on to the next lesson.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted`, `ActivityError::NoActiveLesson` or
    /// `ActivityError::MissingMiniGame`.
    pub fn mini_game_won(&mut self) -> Result<(), ActivityError> {
        self.catalog_ref()?;
        let session = self.active_session()?;
        if session.phase() != SessionPhase::MiniGamePipeline {
            tracing::debug!(lesson = %session.lesson_index(), "mini-game win ignored while words are shown");
            return Ok(());
        }
        self.run_pipeline()
    }

    /// Commit progress, close the lesson and show the menu.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` before `start` or after `stop`.
    pub fn return_to_menu(&mut self) -> Result<(), ActivityError> {
        self.catalog_ref()?;
        self.close_session();
        self.show_menu()
    }

    /// Best saved progress of the lesson at `index`; 0 if never recorded.
    #[must_use]
    pub fn progress_status(&self, index: usize) -> u32 {
        self.progress.best_saved(LessonIndex::new(index))
    }

    /// Menu entries of the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotStarted` before `start` or after `stop`.
    pub fn menu(&self) -> Result<MenuView, ActivityError> {
        let loaded = self.loaded.as_ref().ok_or(ActivityError::NotStarted)?;
        let entries = loaded
            .catalog
            .menu()
            .into_iter()
            .map(|item| MenuEntry {
                best_saved: self.progress.best_saved(item.index),
                item,
            })
            .collect();
        Ok(MenuView {
            entries,
            locale: loaded.catalog.locale().clone(),
            fallback: loaded.tier == ResolutionTier::DefaultFallback,
        })
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.loaded.is_some()
    }

    #[must_use]
    pub fn lesson_index(&self) -> Option<LessonIndex> {
        self.session.as_ref().map(LevelSession::lesson_index)
    }

    #[must_use]
    pub fn sub_item(&self) -> Option<usize> {
        self.session.as_ref().map(LevelSession::sub_item)
    }

    /// `None` while the menu is shown.
    #[must_use]
    pub fn phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(LevelSession::phase)
    }

    #[must_use]
    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&LessonCatalog> {
        self.loaded.as_ref().map(|loaded| &loaded.catalog)
    }

    #[must_use]
    pub fn resolution_tier(&self) -> Option<ResolutionTier> {
        self.loaded.as_ref().map(|loaded| loaded.tier)
    }

    /// True when the default-language dataset stands in for the learner's.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.resolution_tier() == Some(ResolutionTier::DefaultFallback)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    #[must_use]
    pub fn settings(&self) -> &ActivitySettings {
        &self.settings
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn catalog_ref(&self) -> Result<&LessonCatalog, ActivityError> {
        self.catalog().ok_or(ActivityError::NotStarted)
    }

    fn active_session(&self) -> Result<&LevelSession, ActivityError> {
        self.session.as_ref().ok_or(ActivityError::NoActiveLesson)
    }

    fn enter_index(&mut self, index: LessonIndex) -> Result<(), ActivityError> {
        self.close_session();
        let loaded = self.loaded.as_ref().ok_or(ActivityError::NotStarted)?;
        let lesson = loaded
            .catalog
            .lesson(index)
            .ok_or(ActivityError::NoActiveLesson)?;
        self.session = Some(LevelSession::enter(
            index,
            lesson,
            &mut self.progress,
            &mut self.shuffler,
        ));
        self.show_sub_item();
        Ok(())
    }

    /// Ratchet the active attempt into the saved progress and drop the session.
    fn close_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let lesson = session.lesson_index();
        if let Some(best) = self.progress.commit_current(lesson) {
            self.persist(lesson, best);
        }
    }

    fn persist(&self, lesson: LessonIndex, best: u32) {
        if let Err(err) = self.store.save_best(lesson, best) {
            tracing::warn!(%lesson, best, error = %err, "failed to save progress");
        }
    }

    fn run_pipeline(&mut self) -> Result<(), ActivityError> {
        let step = {
            let loaded = self.loaded.as_ref().ok_or(ActivityError::NotStarted)?;
            let session = self.session.as_mut().ok_or(ActivityError::NoActiveLesson)?;
            let lesson = loaded
                .catalog
                .lesson(session.lesson_index())
                .ok_or(ActivityError::NoActiveLesson)?;
            let step = self.sequencer.advance(session, lesson, &mut self.shuffler);
            (step, session.total())
        };

        match step {
            (SequencerStep::Dispatch(dispatch), total) => {
                self.sequencer.launch(dispatch, total, self.sink.as_mut())
            }
            (SequencerStep::Exhausted, _) => {
                tracing::info!(lesson = ?self.lesson_index(), "lesson complete");
                self.next_lesson()
            }
        }
    }

    fn show_menu(&mut self) -> Result<(), ActivityError> {
        let menu = self.menu()?;
        self.sink.show(ActivityView::Menu(menu));
        Ok(())
    }

    fn show_sub_item(&mut self) {
        if let Some(view) = self.session.as_ref().and_then(LevelSession::sub_item_view) {
            self.sink.show(ActivityView::SubItem(view));
        }
    }
}

impl fmt::Debug for ActivityController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityController")
            .field("settings", &self.settings)
            .field("sequencer", &self.sequencer)
            .field("started", &self.is_started())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
