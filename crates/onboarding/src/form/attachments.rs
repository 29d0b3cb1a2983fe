use std::fmt;

use crate::intake::domain::DocumentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("no attachment slot {0}")]
    UnknownSlot(AttachmentId),
    #[error("Please select a file type before uploading.")]
    KindNotSelected,
    #[error("Please upload a valid {kind} file.")]
    InvalidFile { kind: DocumentKind, content_type: String },
}

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSlot {
    pub id: AttachmentId,
    pub kind: Option<DocumentKind>,
    pub file: Option<AttachedFile>,
}

/// Ordered, growable list of document slots. Starts with two empty slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentList {
    slots: Vec<AttachmentSlot>,
    next_id: u64,
}

impl Default for AttachmentList {
    fn default() -> Self {
        let mut list = Self {
            slots: Vec::new(),
            next_id: 1,
        };
        list.add_slot();
        list.add_slot();
        list
    }
}

impl AttachmentList {
    pub fn add_slot(&mut self) -> AttachmentId {
        let id = AttachmentId(self.next_id);
        self.next_id += 1;
        self.slots.push(AttachmentSlot {
            id,
            kind: None,
            file: None,
        });
        id
    }

    /// Drop a slot and whatever it holds. Returns whether the slot existed.
    pub fn remove_slot(&mut self, id: AttachmentId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    pub fn select_kind(&mut self, id: AttachmentId, kind: DocumentKind) -> Result<(), AttachmentError> {
        self.slot_mut(id)?.kind = Some(kind);
        Ok(())
    }

    /// Attach a file to a slot whose kind is already chosen. The slot keeps its previous file
    /// when the new one is refused.
    pub fn attach(&mut self, id: AttachmentId, file: AttachedFile) -> Result<(), AttachmentError> {
        let slot = self.slot_mut(id)?;
        let kind = slot.kind.ok_or(AttachmentError::KindNotSelected)?;
        if !kind.accepts_upload(&file.content_type) {
            return Err(AttachmentError::InvalidFile {
                kind,
                content_type: file.content_type,
            });
        }
        slot.file = Some(file);
        Ok(())
    }

    pub fn slots(&self) -> &[AttachmentSlot] {
        &self.slots
    }

    /// Files that will be sent, in slot order.
    pub fn files(&self) -> impl Iterator<Item = &AttachedFile> {
        self.slots.iter().filter_map(|slot| slot.file.as_ref())
    }

    fn slot_mut(&mut self, id: AttachmentId) -> Result<&mut AttachmentSlot, AttachmentError> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .ok_or(AttachmentError::UnknownSlot(id))
    }
}
