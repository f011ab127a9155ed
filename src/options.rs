//! Concurrent option fetching for entry forms.
//!
//! Every fetch is spawned as its own task the moment it is handed over, so
//! none of them waits behind another. Collecting joins all of them; a fetch
//! that fails (or whose task dies) contributes an empty `OptionSet` and a
//! warning instead of an error.

use crate::errors::AppResult;
use crate::models::reference::{OptionSet, ReferenceKind};
use crate::store::ReferenceRepository;
use futures::future::{BoxFuture, FutureExt, join_all};
use tokio::task::JoinHandle;

pub type OptionFetch = BoxFuture<'static, AppResult<OptionSet>>;

/// Fetches that are already running.
pub struct PendingOptions {
    tasks: Vec<(&'static str, JoinHandle<AppResult<OptionSet>>)>,
}

/// Spawn each labelled fetch immediately. Must be called inside a tokio runtime.
pub fn start_all<I>(fetches: I) -> PendingOptions
where
    I: IntoIterator<Item = (&'static str, OptionFetch)>,
{
    let tasks = fetches
        .into_iter()
        .map(|(label, fetch)| (label, tokio::spawn(fetch)))
        .collect();

    PendingOptions { tasks }
}

impl PendingOptions {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every fetch; results come back in the order they were started.
    pub async fn collect(self) -> Vec<OptionSet> {
        let joined = join_all(
            self.tasks
                .into_iter()
                .map(|(label, handle)| async move { (label, handle.await) }),
        )
        .await;

        joined
            .into_iter()
            .map(|(label, outcome)| match outcome {
                Ok(Ok(set)) => set,
                Ok(Err(e)) => {
                    tracing::warn!(fetch = label, error = %e, "Option fetch failed, using an empty set");
                    OptionSet::new()
                }
                Err(e) => {
                    tracing::warn!(fetch = label, error = %e, "Option fetch task did not complete, using an empty set");
                    OptionSet::new()
                }
            })
            .collect()
    }
}

/// The selections every entry form needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOptions {
    pub vendors: OptionSet,
    pub departments: OptionSet,
}

pub struct PendingFormOptions(PendingOptions);

impl FormOptions {
    /// Start the vendor and department fetches concurrently.
    pub fn start(references: &ReferenceRepository) -> PendingFormOptions {
        PendingFormOptions(start_all([
            fetch(references, ReferenceKind::Vendor),
            fetch(references, ReferenceKind::Department),
        ]))
    }
}

impl PendingFormOptions {
    pub async fn collect(self) -> FormOptions {
        let mut sets = self.0.collect().await.into_iter();
        FormOptions {
            vendors: sets.next().unwrap_or_default(),
            departments: sets.next().unwrap_or_default(),
        }
    }
}

fn fetch(references: &ReferenceRepository, kind: ReferenceKind) -> (&'static str, OptionFetch) {
    let references = references.clone();
    (
        kind.label(),
        async move { references.options(kind).await }.boxed(),
    )
}
