//! Synchronization engine
//!
//! Each command runs to completion before returning: fetch, transform,
//! patch or assemble, push, render. Awaits are strictly sequential.
//!
//! Abort conditions (malformed sheet, missing mandatory field, missing
//! marker region, remote failure) are reported to the operator through the
//! [`Notifier`] before the error is returned to the caller.

use crate::collaborators::{DocumentStore, Notifier, TableStore};
use crate::config::SyncConfig;
use crate::error::{ConfigError, SyncError, SyncResult};
use crate::outcome::{Change, Command, LinkReport, SyncOutcome, SyncStats};
use reqsync_core::escape;
use reqsync_core::record::keys;
use reqsync_core::{
    assemble_link_tracker, marked_ids, parse_roster, patch, validate_markers, Assembler, BodyDigest,
    Document, DocumentId, FieldRecord, LinkGraph, PatchError, PatchOutcome, Sheet, ERROR_BANNER,
};
use std::collections::HashMap;

/// Columns written back when a roster is pulled into the table store
pub const ROSTER_COLUMNS: [&str; 3] = [keys::ID, keys::TITLE, keys::DESCRIPTION];

/// Drives document and table synchronization through the collaborators
pub struct SyncEngine<D, T, N> {
    config: SyncConfig,
    assembler: Assembler,
    documents: D,
    tables: T,
    notifier: N,
}

impl<D, T, N> SyncEngine<D, T, N>
where
    D: DocumentStore,
    T: TableStore,
    N: Notifier,
{
    /// Create engine
    ///
    /// # Errors
    /// [`ConfigError::InvalidIdPattern`] if the configured ID regex does not
    /// compile.
    pub fn new(config: SyncConfig, documents: D, tables: T, notifier: N) -> Result<Self, ConfigError> {
        let assembler = config.assembler()?;
        Ok(Self {
            config,
            assembler,
            documents,
            tables,
            notifier,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Document store collaborator
    #[inline]
    #[must_use]
    pub fn documents(&self) -> &D {
        &self.documents
    }

    /// Table store collaborator
    #[inline]
    #[must_use]
    pub fn tables(&self) -> &T {
        &self.tables
    }

    /// Notification collaborator
    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Rebuild a roster document from the requirement sheet
    ///
    /// On a missing mandatory field the document body is replaced by
    /// [`ERROR_BANNER`] and the error is returned.
    ///
    /// # Errors
    /// [`SyncError::MalformedSource`], [`SyncError::Assemble`] or
    /// [`SyncError::Remote`]; the operator is notified first.
    pub async fn publish_roster(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let result = self.try_publish_roster(doc_id).await;
        self.reported(Command::PublishRoster, result).await
    }

    async fn try_publish_roster(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let records = self.load_records().await?;
        let document = self.documents.fetch_document(doc_id).await?;

        let body = match self.assembler.roster(&records) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(doc_id = %doc_id, "Roster not assembled: {}", err);
                self.push_if_changed(&document, ERROR_BANNER).await?;
                return Err(err.into());
            }
        };

        let change = self.push_if_changed(&document, &body).await?;
        self.finish(SyncOutcome::new(Command::PublishRoster, doc_id, change))
            .await
    }

    /// Rewrite one requirement's marker region from the sheet
    ///
    /// A record missing a mandatory field puts [`ERROR_BANNER`] into its
    /// region. A missing region leaves the page untouched.
    ///
    /// # Errors
    /// [`SyncError::RequirementNotFound`], [`SyncError::Patch`],
    /// [`SyncError::Assemble`], [`SyncError::MalformedSource`] or
    /// [`SyncError::Remote`]; the operator is notified first.
    pub async fn publish_requirement(&self, doc_id: DocumentId, requirement_id: &str) -> SyncResult<SyncOutcome> {
        let result = self.try_publish_requirement(doc_id, requirement_id).await;
        self.reported(Command::PublishRequirement, result).await
    }

    async fn try_publish_requirement(&self, doc_id: DocumentId, requirement_id: &str) -> SyncResult<SyncOutcome> {
        let records = self.load_records().await?;
        let record = records
            .iter()
            .find(|r| r.id() == Some(requirement_id))
            .ok_or_else(|| SyncError::RequirementNotFound(requirement_id.to_string()))?;
        let document = self.documents.fetch_document(doc_id).await?;
        tracing::debug!(doc_id = %doc_id, requirement_id, "Patching requirement region");

        let (fragment, failure) = match self.assembler.requirement_region(record) {
            Ok(fragment) => (fragment, None),
            Err(err) => (banner_region(), Some(err)),
        };

        let change = match patch(&document.body, requirement_id, &fragment)? {
            PatchOutcome::Updated(body) => self.push(&document, &body).await?,
            PatchOutcome::Noop => Change::Noop,
        };
        if let Some(err) = failure {
            return Err(err.into());
        }

        let stats = SyncStats {
            patched: usize::from(change != Change::Noop),
            unchanged: usize::from(change == Change::Noop),
            ..SyncStats::default()
        };
        self.finish(SyncOutcome::new(Command::PublishRequirement, doc_id, change).with_stats(stats))
            .await
    }

    /// Rewrite every marker region of a page whose ID has a sheet row
    ///
    /// Regions without a row are left alone and counted as missing. Records
    /// missing a mandatory field get the banner in their region, are counted
    /// as failed and reported; the rest of the page is still published in a
    /// single update.
    ///
    /// # Errors
    /// [`SyncError::Patch`] if a marker is unbalanced, otherwise as
    /// [`publish_requirement`](Self::publish_requirement).
    pub async fn publish_all_requirements(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let result = self.try_publish_all_requirements(doc_id).await;
        self.reported(Command::PublishAllRequirements, result).await
    }

    async fn try_publish_all_requirements(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let records = self.load_records().await?;
        let document = self.documents.fetch_document(doc_id).await?;
        let by_id: HashMap<&str, &FieldRecord> = records.iter().filter_map(|r| Some((r.id()?, r))).collect();
        let is_marker = |id: &str| by_id.contains_key(id) || self.assembler.pattern().is_requirement_id(id);
        validate_markers(&document.body, is_marker)?;
        let mut stats = SyncStats::default();
        let mut failures = Vec::new();
        let mut body = document.body.clone();

        for id in marked_ids(&document.body).into_iter().filter(|id| is_marker(id)) {
            let Some(record) = by_id.get(id.as_str()) else {
                tracing::debug!("No sheet row for marker {}", id);
                stats.missing += 1;
                continue;
            };

            let fragment = match self.assembler.requirement_region(record) {
                Ok(fragment) => fragment,
                Err(err) => {
                    tracing::warn!(doc_id = %doc_id, requirement_id = %id, "Region replaced by banner: {}", err);
                    failures.push(err);
                    body = patch_or_keep(&body, &id, &banner_region())?;
                    continue;
                }
            };

            match patch(&body, &id, &fragment)? {
                PatchOutcome::Updated(updated) => {
                    body = updated;
                    stats.patched += 1;
                }
                PatchOutcome::Noop => stats.unchanged += 1,
            }
        }
        stats.failed = failures.len();

        let change = if body == document.body {
            Change::Noop
        } else {
            self.push(&document, &body).await?
        };

        for err in failures {
            self.notify_operator(&SyncError::from(err).operator_message()).await;
        }

        tracing::info!(
            "Published {} requirements on {}: {} unchanged, {} missing, {} failed",
            stats.patched,
            doc_id,
            stats.unchanged,
            stats.missing,
            stats.failed
        );
        self.finish(SyncOutcome::new(Command::PublishAllRequirements, doc_id, change).with_stats(stats))
            .await
    }

    /// Recover rows from a roster document and write them to the table store
    ///
    /// Malformed entries are skipped and counted in `stats.skipped`.
    ///
    /// # Errors
    /// [`SyncError::Remote`]; the operator is notified first.
    pub async fn pull_roster(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let result = self.try_pull_roster(doc_id).await;
        self.reported(Command::PullRoster, result).await
    }

    async fn try_pull_roster(&self, doc_id: DocumentId) -> SyncResult<SyncOutcome> {
        let document = self.documents.fetch_document(doc_id).await?;
        let parsed = parse_roster(&document.body);
        let sheet = Sheet::from_records(&ROSTER_COLUMNS, &parsed.records());
        let written = sheet.rows().len();

        self.tables
            .write_table_range(&self.config.sheet_id, &self.config.roster_range, &sheet.into_rows())
            .await?;
        tracing::info!(doc_id = %doc_id, skipped = parsed.skipped, "Pulled {} roster rows", written);

        let stats = SyncStats {
            skipped: parsed.skipped,
            ..SyncStats::default()
        };
        self.finish(
            SyncOutcome::new(Command::PullRoster, doc_id, Change::TableWritten { rows: written }).with_stats(stats),
        )
        .await
    }

    /// Rebuild a link tracker document from the given pages
    ///
    /// Pages are fetched one after another in the given order.
    ///
    /// # Errors
    /// [`SyncError::Remote`]; the operator is notified first.
    pub async fn refresh_link_tracker(&self, tracker_id: DocumentId, page_ids: &[DocumentId]) -> SyncResult<SyncOutcome> {
        let result = self.try_refresh_link_tracker(tracker_id, page_ids).await;
        self.reported(Command::RefreshLinkTracker, result).await
    }

    async fn try_refresh_link_tracker(&self, tracker_id: DocumentId, page_ids: &[DocumentId]) -> SyncResult<SyncOutcome> {
        let mut pages = Vec::with_capacity(page_ids.len());
        for id in page_ids {
            pages.push(self.documents.fetch_document(*id).await?);
        }
        let body = assemble_link_tracker(&pages);

        let tracker = self.documents.fetch_document(tracker_id).await?;
        let change = self.push_if_changed(&tracker, &body).await?;
        self.finish(SyncOutcome::new(Command::RefreshLinkTracker, tracker_id, change))
            .await
    }

    /// Incoming and outgoing links of `path` according to a tracker
    ///
    /// # Errors
    /// [`SyncError::Remote`] if the tracker cannot be fetched; the operator
    /// is notified first.
    pub async fn link_report(&self, tracker_id: DocumentId, path: &str) -> SyncResult<LinkReport> {
        let result = match self.documents.fetch_document(tracker_id).await {
            Ok(tracker) => {
                let graph = LinkGraph::parse(&tracker.body);
                Ok(LinkReport {
                    path: reqsync_core::document::normalize_path(path).to_string(),
                    incoming: graph.incoming(path),
                    outgoing: graph.outgoing(path),
                })
            }
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &result {
            self.report_abort(err).await;
        }
        result
    }

    async fn load_records(&self) -> SyncResult<Vec<FieldRecord>> {
        let rows = self
            .tables
            .fetch_table_range(&self.config.sheet_id, &self.config.requirements_range)
            .await?;
        let records = Sheet::from_rows(rows)?.records()?;
        tracing::debug!("Loaded {} records from {}", records.len(), self.config.requirements_range);
        Ok(records)
    }

    async fn push_if_changed(&self, document: &Document, body: &str) -> SyncResult<Change> {
        if document.body == body {
            tracing::debug!("{} unchanged, skipping update", document.id);
            return Ok(Change::Noop);
        }
        self.push(document, body).await
    }

    /// Update then render
    async fn push(&self, document: &Document, body: &str) -> SyncResult<Change> {
        let before = BodyDigest::of(&document.body);
        let after = BodyDigest::of(body);

        self.documents
            .update_document(document.id, &escape::encode(body))
            .await?;
        self.documents.render_document(document.id).await?;

        tracing::info!(
            document = %document.id,
            before = %before.short(),
            after = %after.short(),
            "Document updated"
        );
        Ok(Change::Updated { before, after })
    }

    async fn finish(&self, outcome: SyncOutcome) -> SyncResult<SyncOutcome> {
        if outcome.is_noop() && self.config.notify_on_noop {
            self.notify_operator(&format!("{} {}: already up to date", outcome.command, outcome.document))
                .await;
        }
        Ok(outcome)
    }

    async fn reported<R>(&self, command: Command, result: SyncResult<R>) -> SyncResult<R> {
        if let Err(err) = &result {
            tracing::error!("{} aborted: {}", command, err);
            self.report_abort(err).await;
        }
        result
    }

    async fn report_abort(&self, err: &SyncError) {
        self.notify_operator(&err.operator_message()).await;
    }

    async fn notify_operator(&self, text: &str) {
        if let Err(err) = self.notifier.notify(text).await {
            tracing::error!("Operator notification failed: {}", err);
        }
    }
}

fn banner_region() -> String {
    format!("\n{ERROR_BANNER}")
}

fn patch_or_keep(body: &str, id: &str, fragment: &str) -> Result<String, PatchError> {
    Ok(match patch(body, id, fragment)? {
        PatchOutcome::Updated(updated) => updated,
        PatchOutcome::Noop => body.to_string(),
    })
}
