//! The editing session for one table at a time.

use crate::{
    CommitOutcome, CommitTrigger, DragReorderController, DropTarget, EditedRows, EditorSettings,
    FieldListStore, FormCommitPipeline, NotificationSink, PersistenceGateway, Result, SqliteGateway,
    Table, TableMeta,
};
use std::fs;
use std::path::Path;

/// An open table editor bound to a storage gateway.
///
/// `TableEditor` is the only entry point for changing the field order: it
/// owns the [`FieldListStore`] and [`DragReorderController`] for the table
/// currently shown and routes commits through a [`FormCommitPipeline`].
/// Pointing it at another table replaces the list wholesale and abandons any
/// drag in progress.
pub struct TableEditor<G: PersistenceGateway> {
    gateway: G,
    table: Table,
    fields: FieldListStore,
    drag: DragReorderController,
    pipeline: FormCommitPipeline,
    new_field_prefix: String,
}

impl TableEditor<SqliteGateway> {
    /// Opens the database named in `settings`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchemaboardError::Io`] if the database directory
    /// cannot be created, or any error from [`SqliteGateway::open`] /
    /// [`SqliteGateway::create`].
    pub fn from_settings(settings: &EditorSettings) -> Result<Self> {
        let path = Path::new(&settings.database_path);
        let gateway = if path.exists() {
            SqliteGateway::open(path)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            log::info!("creating table database at {}", path.display());
            SqliteGateway::create(path)?
        };
        Ok(Self::new(gateway, settings))
    }
}

impl<G: PersistenceGateway> TableEditor<G> {
    /// Creates an editor with no table loaded.
    pub fn new(gateway: G, settings: &EditorSettings) -> Self {
        Self {
            gateway,
            table: Table::default(),
            fields: FieldListStore::new().with_new_field_prefix(&settings.new_field_prefix),
            drag: DragReorderController::new(),
            pipeline: FormCommitPipeline::new(),
            new_field_prefix: settings.new_field_prefix.clone(),
        }
    }

    /// Points the editor at `table`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchemaboardError::InvalidTable`] if the table repeats
    /// a field id; the previously open table stays loaded in that case.
    pub fn open_table(&mut self, table: Table) -> Result<()> {
        let fields = FieldListStore::from_fields(table.fields.clone())?
            .with_new_field_prefix(&self.new_field_prefix);
        self.fields = fields;
        self.drag = DragReorderController::new();
        self.table = table;
        Ok(())
    }

    /// Loads the stored record for `table_id` into the editor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SchemaboardError::TableNotFound`] if nothing is stored
    /// under that id.
    pub fn load(&mut self, table_id: &str) -> Result<()> {
        let record = self.gateway.get(table_id)?;
        self.open_table(record.to_table())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn fields(&self) -> &FieldListStore {
        &self.fields
    }

    pub fn drag(&self) -> &DragReorderController {
        &self.drag
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Whether there are edits not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.fields.is_dirty()
    }

    /// Called by the form layer whenever a row value changes.
    pub fn mark_form_changed(&mut self) {
        self.fields.mark_changed();
    }

    /// Table-level commit values taken from the loaded table, including the
    /// relation and layout payloads it was stored with.
    pub fn current_meta(&self) -> TableMeta {
        TableMeta {
            name: self.table.name.clone(),
            note: self.table.note.clone(),
            relations: self.table.relations.clone(),
            layout: self.table.layout.clone(),
        }
    }

    // ── Field list ────────────────────────────────────────────────

    pub fn insert_after(&mut self, index: isize) -> String {
        self.fields.insert_after(index)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.fields.remove(id)
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        self.fields.move_up(index)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        self.fields.move_down(index)
    }

    pub fn move_to(&mut self, source_id: &str, target_id: &str) -> bool {
        self.fields.move_to(source_id, target_id)
    }

    pub fn move_to_front(&mut self, source_id: &str) -> bool {
        self.fields.move_to_front(source_id)
    }

    // ── Drag gestures ─────────────────────────────────────────────

    pub fn drag_start(&mut self, id: &str) {
        self.drag.drag_start(id, &self.fields);
    }

    pub fn drag_over(&mut self, candidate: &str) {
        self.drag.drag_over(candidate);
    }

    pub fn drag_over_container(&mut self) {
        self.drag.drag_over_container(&self.fields);
    }

    pub fn drop(&mut self, target: DropTarget) -> bool {
        self.drag.drop(target, &mut self.fields)
    }

    pub fn drag_end(&mut self) {
        self.drag.drag_end();
    }

    pub fn highlighted_target(&self) -> Option<&DropTarget> {
        self.drag.highlighted_target(&self.fields)
    }

    // ── Commit ────────────────────────────────────────────────────

    /// Commits `rows` if `trigger` is armed; returns `Ok(None)` otherwise.
    ///
    /// On success the editor reloads its list from the committed fields, so
    /// the committed order becomes the new baseline and the dirty flag
    /// clears. On failure the list and any reordering are kept as they were.
    ///
    /// # Errors
    ///
    /// See [`FormCommitPipeline::commit`].
    pub fn commit(
        &mut self,
        trigger: &mut CommitTrigger,
        rows: &EditedRows,
        meta: &TableMeta,
        sink: &dyn NotificationSink,
    ) -> Result<Option<CommitOutcome>> {
        if !trigger.is_armed() {
            return Ok(None);
        }
        let table_id = self.table.id.clone();
        let outcome = self
            .pipeline
            .commit(&mut self.gateway, sink, trigger, &table_id, rows, meta)?;

        let (x, y) = (self.table.x, self.table.y);
        self.open_table(Table { x, y, ..outcome.record.to_table() })?;
        Ok(Some(outcome))
    }
}
