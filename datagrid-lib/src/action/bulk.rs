//! Selection-gated confirmation for bulk actions.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use log::{error, info};

use crate::error::ActionError;
use crate::model::TableModel;

/// Error type returned by bulk actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An operation applied to a set of selected rows.
///
/// Any `Fn(Vec<String>) -> impl Future<Output = Result<(), E>>` closure is a
/// bulk action, so most callers never implement this trait by hand.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use datagrid_lib::action::{BoxError, BulkAction};
///
/// struct DeleteUsers {
///     client: ApiClient,
/// }
///
/// #[async_trait]
/// impl BulkAction for DeleteUsers {
///     async fn run(&self, ids: Vec<String>) -> Result<(), BoxError> {
///         self.client.delete_users(&ids).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait BulkAction: Send + Sync {
    /// Runs the action on `ids`, in row order.
    async fn run(&self, ids: Vec<String>) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut, E> BulkAction for F
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn run(&self, ids: Vec<String>) -> Result<(), BoxError> {
        (self)(ids).await.map_err(Into::into)
    }
}

/// Where a bulk action reads its targets from.
pub trait SelectionSource {
    /// Selected row ids, in row order.
    fn selected_ids(&self) -> Vec<String>;

    /// Empties the selection.
    fn clear_selected(&self);
}

impl<T> SelectionSource for TableModel<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn selected_ids(&self) -> Vec<String> {
        TableModel::selected_ids(self)
    }

    fn clear_selected(&self) {
        self.clear_selection();
    }
}

#[derive(Debug, Default)]
struct DialogState {
    open: bool,
    busy: bool,
}

/// Confirmation surface guarding a bulk action.
///
/// The trigger is only enabled while rows are selected. Confirming runs the
/// action once with the selected ids; on success the selection is cleared
/// and the dialog closes, on failure the error is logged and both stay as
/// they were so the user can retry. A second confirm while the action is
/// still running is refused.
///
/// Cheap to clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let dialog = BulkActionDialog::new(|ids: Vec<String>| async move {
///     api.delete(ids).await
/// })
/// .title("Delete users")
/// .description("Delete {count} selected user(s)? This cannot be undone.");
///
/// if dialog.can_trigger(&table) {
///     dialog.open(&table)?;
/// }
/// dialog.confirm(&table).await?;
/// ```
#[derive(Clone)]
pub struct BulkActionDialog {
    action: Arc<dyn BulkAction>,
    state: Arc<Mutex<DialogState>>,
    title: String,
    description: String,
    confirm_label: String,
}

/// Clears the busy flag when the running action finishes or is dropped.
struct BusyGuard<'a> {
    state: &'a Mutex<DialogState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .busy = false;
    }
}

impl BulkActionDialog {
    /// Creates a closed dialog for `action`.
    pub fn new(action: impl BulkAction + 'static) -> Self {
        Self {
            action: Arc::new(action),
            state: Arc::new(Mutex::new(DialogState::default())),
            title: "Are you absolutely sure?".into(),
            description: "This will permanently delete {count} selected row(s).".into(),
            confirm_label: "Delete".into(),
        }
    }

    /// Sets the dialog title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description template; `{count}` is replaced by the number
    /// of selected rows.
    pub fn description(mut self, template: impl Into<String>) -> Self {
        self.description = template.into();
        self
    }

    /// Sets the confirm button label.
    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn title_text(&self) -> &str {
        &self.title
    }

    pub fn confirm_text(&self) -> &str {
        &self.confirm_label
    }

    /// Description with the selected row count filled in.
    pub fn description_text(&self, count: usize) -> String {
        self.description.replace("{count}", &count.to_string())
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    /// Whether the trigger button is enabled.
    pub fn can_trigger(&self, source: &impl SelectionSource) -> bool {
        !source.selected_ids().is_empty()
    }

    /// Opens the confirmation surface.
    pub fn open(&self, source: &impl SelectionSource) -> Result<(), ActionError> {
        if !self.can_trigger(source) {
            return Err(ActionError::EmptySelection);
        }
        self.lock().open = true;
        Ok(())
    }

    /// Closes the surface without running the action.
    pub fn cancel(&self) -> Result<(), ActionError> {
        let mut state = self.lock();
        if state.busy {
            return Err(ActionError::Busy);
        }
        state.open = false;
        Ok(())
    }

    /// Runs the action on the current selection.
    pub async fn confirm<S>(&self, source: &S) -> Result<(), ActionError>
    where
        S: SelectionSource + Sync,
    {
        let ids = {
            let mut state = self.lock();
            if !state.open {
                return Err(ActionError::NotOpen);
            }
            if state.busy {
                return Err(ActionError::Busy);
            }
            let ids = source.selected_ids();
            if ids.is_empty() {
                return Err(ActionError::EmptySelection);
            }
            state.busy = true;
            ids
        };

        let count = ids.len();
        info!("Bulk action: running on {count} row(s)");
        // busy stays set until the outcome is applied
        let _busy = BusyGuard { state: &self.state };
        match self.action.run(ids).await {
            Ok(()) => {
                source.clear_selected();
                self.lock().open = false;
                info!("Bulk action: completed on {count} row(s)");
                Ok(())
            }
            Err(err) => {
                error!("Bulk action failed on {count} row(s): {err}");
                Err(ActionError::failed(err))
            }
        }
    }
}

impl std::fmt::Debug for BulkActionDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("BulkActionDialog")
            .field("title", &self.title)
            .field("open", &state.open)
            .field("busy", &state.busy)
            .finish()
    }
}
