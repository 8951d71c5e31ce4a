use tracing::debug;

use crate::pages::{Page, PageId};
use crate::validation::{Field, Rules};

/// Whether a field is shown or being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Viewing,
    Editing,
}

/// Draft state for one field.
///
/// `committed` is the last value known to be persisted (or the initial
/// value); `value` is the draft. `error` is only set while the most recent
/// validation of `value` failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftField {
    committed: String,
    value: String,
    mode: FieldMode,
    error: Option<String>,
}

impl DraftField {
    fn new(committed: impl Into<String>) -> Self {
        let committed = committed.into();
        Self {
            value: committed.clone(),
            committed,
            mode: FieldMode::Viewing,
            error: None,
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn mode(&self) -> FieldMode {
        self.mode
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, FieldMode::Editing)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while editing and the draft differs from the committed value.
    pub fn is_dirty(&self) -> bool {
        self.is_editing() && self.value != self.committed
    }

    fn reset(&mut self) {
        self.value.clone_from(&self.committed);
        self.error = None;
    }
}

/// Title and body drafts for one page.
///
/// The two fields are edited and saved independently: saving the title
/// sends the body's committed value, never an unsaved body draft, and the
/// other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEditor {
    page_id: PageId,
    rules: Rules,
    title: DraftField,
    body: DraftField,
}

impl PageEditor {
    pub fn new(
        page_id: PageId,
        title: impl Into<String>,
        body: impl Into<String>,
        rules: Rules,
    ) -> Self {
        Self {
            page_id,
            rules,
            title: DraftField::new(title),
            body: DraftField::new(body),
        }
    }

    /// An editor on the persisted state of `page`.
    pub fn for_page(page: &Page, rules: Rules) -> Self {
        Self::new(page.id.clone(), page.title.clone(), page.body.clone(), rules)
    }

    pub const fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub const fn field(&self, field: Field) -> &DraftField {
        match field {
            Field::Title => &self.title,
            Field::Body => &self.body,
        }
    }

    const fn field_mut(&mut self, field: Field) -> &mut DraftField {
        match field {
            Field::Title => &mut self.title,
            Field::Body => &mut self.body,
        }
    }

    pub const fn is_editing_any(&self) -> bool {
        self.title.is_editing() || self.body.is_editing()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.title.is_dirty() || self.body.is_dirty()
    }

    /// `Viewing -> Editing`, starting from the committed value.
    ///
    /// Already editing is a no-op so the draft is not thrown away.
    pub fn start_edit(&mut self, field: Field) {
        let draft = self.field_mut(field);
        if draft.is_editing() {
            return;
        }
        draft.reset();
        draft.mode = FieldMode::Editing;
    }

    /// Replace the draft. Ignored (returns `false`) unless editing.
    ///
    /// Does not validate and leaves any error from the last save in place.
    pub fn change(&mut self, field: Field, value: impl Into<String>) -> bool {
        let draft = self.field_mut(field);
        if !draft.is_editing() {
            return false;
        }
        draft.value = value.into();
        true
    }

    /// `Editing -> Viewing`, discarding the draft. Never persists.
    pub fn cancel(&mut self, field: Field) {
        let draft = self.field_mut(field);
        draft.reset();
        draft.mode = FieldMode::Viewing;
    }

    /// Validate the draft and, if it passes, hand `(title, body)` to `on_save`.
    ///
    /// The saved field contributes its draft, the other field its committed
    /// value. On failure the error is recorded, the mode is unchanged and
    /// `on_save` is not called. Returns whether the save went through.
    pub fn save(&mut self, field: Field, on_save: impl FnOnce(&str, &str)) -> bool {
        let rules = self.rules;
        let draft = self.field_mut(field);
        if let Err(err) = rules.validate(field, &draft.value) {
            debug!(%field, message = %err.message, "validation failed");
            draft.error = Some(err.message);
            return false;
        }
        draft.error = None;
        draft.committed.clone_from(&draft.value);
        draft.mode = FieldMode::Viewing;

        on_save(self.title_to_send(field), self.body_to_send(field));
        true
    }

    fn title_to_send(&self, saved: Field) -> &str {
        if saved == Field::Title {
            &self.title.value
        } else {
            &self.title.committed
        }
    }

    fn body_to_send(&self, saved: Field) -> &str {
        if saved == Field::Body {
            &self.body.value
        } else {
            &self.body.committed
        }
    }

    /// Take new committed values from the authoritative record.
    ///
    /// Fields being edited keep their draft; fields being viewed show the
    /// new value.
    pub fn sync_committed(&mut self, title: &str, body: &str) {
        for (draft, value) in [(&mut self.title, title), (&mut self.body, body)] {
            if draft.committed == value {
                continue;
            }
            draft.committed = value.to_string();
            if !draft.is_editing() {
                draft.value = value.to_string();
            }
        }
    }
}
