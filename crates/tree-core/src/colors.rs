//! Per-particle color buffers and the single active-buffer slot.
//!
//! Buffers are never edited in place once published. A new photo produces a
//! new buffer that replaces the active one wholesale; readers holding the old
//! `Arc` keep a consistent view until they drop it.

use crate::error::TreeError;
use crate::field::ParticleField;
use std::sync::Arc;

/// Flat, index-aligned RGB triples in [0, 1].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorBuffer {
    rgb: Vec<[f32; 3]>,
}

impl ColorBuffer {
    pub fn new(rgb: Vec<[f32; 3]>) -> Self {
        Self { rgb }
    }

    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<[f32; 3]> {
        self.rgb.get(index).copied()
    }

    pub fn as_slice(&self) -> &[[f32; 3]] {
        &self.rgb
    }

    /// Colors as `r, g, b, r, g, b, ...` for vertex upload.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.rgb)
    }
}

impl FromIterator<[f32; 3]> for ColorBuffer {
    fn from_iter<I: IntoIterator<Item = [f32; 3]>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSource {
    Default,
    Image,
}

/// Handed out when a photo selection starts; presented again when its
/// sampling pass finishes so late results can be recognised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Applied,
    /// A newer selection or a clear already landed; the result was dropped.
    Stale,
}

/// Owner of the currently displayed color buffer.
///
/// Tickets increase monotonically. A completed upload is applied only when
/// its ticket is newer than whatever produced the current state, so an old
/// decode finishing late never overwrites a newer photo or a clear.
#[derive(Debug)]
pub struct ActiveColors {
    defaults: Arc<ColorBuffer>,
    active: Arc<ColorBuffer>,
    source: ColorSource,
    issued: u64,
    applied: u64,
    revision: u64,
}

impl ActiveColors {
    pub fn new(field: &ParticleField) -> Self {
        let defaults = Arc::new(field.default_colors().clone());
        Self {
            active: defaults.clone(),
            defaults,
            source: ColorSource::Default,
            issued: 0,
            applied: 0,
            revision: 0,
        }
    }

    pub fn active(&self) -> &Arc<ColorBuffer> {
        &self.active
    }

    pub fn defaults(&self) -> &Arc<ColorBuffer> {
        &self.defaults
    }

    pub fn source(&self) -> ColorSource {
        self.source
    }

    /// Bumped on every swap; renderers compare it to skip redundant uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin_upload(&mut self) -> UploadTicket {
        self.issued += 1;
        UploadTicket(self.issued)
    }

    /// Swap in a sampled buffer, or report why it was not.
    ///
    /// Errors (including a buffer of the wrong length) leave the active
    /// buffer untouched but still retire older tickets. Stale tickets are
    /// not an error.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<ColorBuffer, TreeError>,
    ) -> Result<UploadOutcome, TreeError> {
        if ticket.0 <= self.applied {
            log::debug!(
                "[colors] dropping stale upload #{} (current #{})",
                ticket.0,
                self.applied
            );
            return Ok(UploadOutcome::Stale);
        }
        // A failed selection still supersedes every older one
        self.applied = ticket.0;
        let buffer = result.map_err(|e| {
            log::warn!("[colors] upload #{} rejected: {}", ticket.0, e);
            e
        })?;
        if buffer.len() != self.defaults.len() {
            return Err(TreeError::BufferLength {
                expected: self.defaults.len(),
                actual: buffer.len(),
            });
        }
        self.swap(Arc::new(buffer), ColorSource::Image);
        Ok(UploadOutcome::Applied)
    }

    /// Retire a ticket whose upload never produced bytes to sample. Returns
    /// false if the ticket had already been superseded.
    pub fn abandon_upload(&mut self, ticket: UploadTicket) -> bool {
        let current = ticket.0 > self.applied;
        self.applied = self.applied.max(ticket.0);
        current
    }

    /// True while a ticket newer than the current state is outstanding.
    pub fn has_pending_upload(&self) -> bool {
        self.issued > self.applied
    }

    /// Revert to the field's default palette and drop any in-flight uploads.
    pub fn clear(&mut self) {
        self.applied = self.issued;
        self.swap(self.defaults.clone(), ColorSource::Default);
    }

    /// Adopt a regenerated field. Photo colors keyed to the old surface
    /// coordinates no longer apply, so this also reverts to defaults.
    pub fn reset(&mut self, field: &ParticleField) {
        self.defaults = Arc::new(field.default_colors().clone());
        self.clear();
    }

    fn swap(&mut self, next: Arc<ColorBuffer>, source: ColorSource) {
        self.active = next;
        self.source = source;
        self.revision += 1;
    }
}
