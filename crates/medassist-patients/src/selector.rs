use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use medassist_core::models::patient::{DraftPatient, Patient};

use crate::draft;
use crate::error::{CreateError, FetchError};
use crate::filter::FilteredView;
use crate::normalize::Normalizer;
use crate::source::PatientSource;
use crate::token::TokenProvider;

type SelectionCallback = Box<dyn Fn(&Patient) + Send + Sync>;
type CreateCallback = Box<dyn Fn(&DraftPatient) + Send + Sync>;

/// What happens to the selection when a refresh no longer contains it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep the selection even if its id is gone.
    #[default]
    Retain,
    /// Drop back to "nothing selected".
    ClearWhenMissing,
}

/// What the host should show around the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No refresh has succeeded or failed yet.
    NotLoaded,
    /// A refresh is in flight; the last good list is still served.
    Loading,
    /// The last refresh succeeded.
    Loaded,
    /// The last refresh failed and nothing was ever loaded.
    Failed { error: FetchError },
    /// The last refresh failed; the list is from an earlier success.
    Stale { error: FetchError },
}

#[derive(Default)]
struct SelectorState {
    patients: Arc<[Patient]>,
    search_term: String,
    selected: Option<Patient>,
    loaded: bool,
    last_error: Option<FetchError>,
    in_flight: usize,
    next_request: u64,
}

/// Cached patient list with search, selection and draft creation.
///
/// All methods take `&self`: the list can be searched and selected from
/// while a [`refresh`](Self::refresh) is awaiting the network. The state
/// lock is never held across an await point.
pub struct PatientSelector {
    source: Arc<dyn PatientSource>,
    tokens: Arc<dyn TokenProvider>,
    normalizer: Normalizer,
    policy: SelectionPolicy,
    state: Mutex<SelectorState>,
    on_selection_changed: Option<SelectionCallback>,
    on_create_requested: Option<CreateCallback>,
}

impl PatientSelector {
    pub fn new(source: Arc<dyn PatientSource>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            source,
            tokens,
            normalizer: Normalizer::default(),
            policy: SelectionPolicy::default(),
            state: Mutex::new(SelectorState::default()),
            on_selection_changed: None,
            on_create_requested: None,
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Called with the new selection on every [`select`](Self::select).
    pub fn on_selection_changed(
        mut self,
        callback: impl Fn(&Patient) + Send + Sync + 'static,
    ) -> Self {
        self.on_selection_changed = Some(Box::new(callback));
        self
    }

    /// Called with the draft on every successful
    /// [`request_create`](Self::request_create).
    pub fn on_create_requested(
        mut self,
        callback: impl Fn(&DraftPatient) + Send + Sync + 'static,
    ) -> Self {
        self.on_create_requested = Some(Box::new(callback));
        self
    }

    /// Fetch the list once and replace the cached copy.
    ///
    /// On failure the previous list is kept and the error returned; nothing
    /// is retried here. When refreshes overlap, the last one to complete
    /// determines the list.
    pub async fn refresh(&self) -> Result<Arc<[Patient]>, FetchError> {
        let (request, _in_flight) = self.begin_request();

        let outcome = self.fetch().await;

        let mut state = self.lock();
        match outcome {
            Ok(patients) => {
                let patients: Arc<[Patient]> = patients.into();
                state.patients = patients.clone();
                state.loaded = true;
                state.last_error = None;
                self.reconcile_selection(&mut state);
                tracing::info!(request, count = patients.len(), "patient list refreshed");
                Ok(patients)
            }
            Err(e) => {
                tracing::warn!(
                    request,
                    error = %e,
                    kept = state.patients.len(),
                    "patient list refresh failed, keeping previous list"
                );
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn load_state(&self) -> LoadState {
        let state = self.lock();
        if state.in_flight > 0 {
            return LoadState::Loading;
        }
        match (&state.last_error, state.loaded) {
            (Some(error), true) => LoadState::Stale {
                error: error.clone(),
            },
            (Some(error), false) => LoadState::Failed {
                error: error.clone(),
            },
            (None, true) => LoadState::Loaded,
            (None, false) => LoadState::NotLoaded,
        }
    }

    /// The full cached list in server order.
    pub fn patients(&self) -> Arc<[Patient]> {
        self.lock().patients.clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.lock().search_term = term.into();
    }

    pub fn search_term(&self) -> String {
        self.lock().search_term.clone()
    }

    /// Patients matching the current search term, in server order.
    pub fn filtered_view(&self) -> FilteredView {
        let state = self.lock();
        FilteredView::new(state.patients.clone(), &state.search_term)
    }

    /// Make `patient` the selection. Membership in the current list is not
    /// checked.
    pub fn select(&self, patient: &Patient) {
        {
            let mut state = self.lock();
            if state.selected.as_ref().map(|p| &p.id) != Some(&patient.id) {
                tracing::debug!(id = %patient.id, "patient selected");
            }
            state.selected = Some(patient.clone());
        }
        // outside the lock: the callback may read the selector
        if let Some(callback) = &self.on_selection_changed {
            callback(patient);
        }
    }

    pub fn selected(&self) -> Option<Patient> {
        self.lock().selected.clone()
    }

    /// Turn a typed name into a draft and hand it to the create callback.
    /// The cached list is left alone; the host persists the draft and
    /// refreshes.
    pub fn request_create(&self, raw_name: &str) -> Result<DraftPatient, CreateError> {
        let draft = draft::parse_draft(raw_name)?;
        tracing::debug!(name = %draft.display_name(), "patient creation requested");
        if let Some(callback) = &self.on_create_requested {
            callback(&draft);
        }
        Ok(draft)
    }

    async fn fetch(&self) -> Result<Vec<Patient>, FetchError> {
        let token = self.tokens.bearer_token().await?;
        let response = self.source.fetch(&token).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        self.normalizer.parse_body(&response.body)
    }

    fn begin_request(&self) -> (u64, InFlight<'_>) {
        let mut state = self.lock();
        state.in_flight += 1;
        state.next_request += 1;
        (state.next_request, InFlight { selector: self })
    }

    fn reconcile_selection(&self, state: &mut SelectorState) {
        if self.policy != SelectionPolicy::ClearWhenMissing {
            return;
        }
        let missing = state
            .selected
            .as_ref()
            .is_some_and(|sel| !state.patients.iter().any(|p| p.id == sel.id));
        if missing {
            tracing::debug!("selected patient no longer listed, clearing selection");
            state.selected = None;
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts a refresh as in flight until dropped, including when the
/// refresh future is dropped before completing.
struct InFlight<'a> {
    selector: &'a PatientSelector,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.selector.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}
