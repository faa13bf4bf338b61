//! The `ParcelStore` — authoritative parcel collection plus O(1) tracking index.
//!
//! The dense `Vec<Parcel>` is the authoritative collection, ordered by
//! booking time (the dispatch pass relies on this for stable equal-priority
//! ordering).  The `FxHashMap` maps tracking ids onto indices for O(1)
//! customer lookups.  Both are private and only mutated together, so
//! membership can never disagree between them.
//!
//! Parcels are never removed: tracking a delivered, lost, or cancelled parcel
//! must keep working for the whole process lifetime.  Retirement is a status,
//! not a deletion.

use rustc_hash::FxHashMap;

use px_core::{ParcelIdx, SimRng, TrackingId};

use crate::parcel::Parcel;
use crate::{ModelError, ModelResult};

#[derive(Default)]
pub struct ParcelStore {
    parcels: Vec<Parcel>,
    index:   FxHashMap<TrackingId, ParcelIdx>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a tracking id that is not yet registered.
    ///
    /// Collisions in a 64-bit space are vanishingly rare, but the re-draw
    /// makes uniqueness a guarantee rather than a probability.
    pub fn allocate_id(&self, rng: &mut SimRng) -> TrackingId {
        loop {
            let id = TrackingId::generate(rng);
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register a parcel under its tracking id.
    ///
    /// Rejects duplicate ids instead of corrupting the index; callers using
    /// [`allocate_id`][Self::allocate_id] never see this error.
    pub fn insert(&mut self, parcel: Parcel) -> ModelResult<ParcelIdx> {
        if self.index.contains_key(&parcel.id) {
            return Err(ModelError::DuplicateTracking(parcel.id));
        }
        let idx = ParcelIdx(self.parcels.len() as u32);
        self.index.insert(parcel.id, idx);
        self.parcels.push(parcel);
        Ok(idx)
    }

    /// O(1) lookup by tracking id.
    pub fn get(&self, id: TrackingId) -> Option<&Parcel> {
        self.index.get(&id).map(|idx| &self.parcels[idx.index()])
    }

    /// O(1) mutable lookup by tracking id.
    pub fn get_mut(&mut self, id: TrackingId) -> Option<&mut Parcel> {
        let idx = *self.index.get(&id)?;
        Some(&mut self.parcels[idx.index()])
    }

    /// Direct access by store index (trip manifests hold these).
    #[inline]
    pub fn by_idx(&self, idx: ParcelIdx) -> &Parcel {
        &self.parcels[idx.index()]
    }

    #[inline]
    pub fn by_idx_mut(&mut self, idx: ParcelIdx) -> &mut Parcel {
        &mut self.parcels[idx.index()]
    }

    /// All parcels in booking order.
    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.iter()
    }

    /// All parcels with their indices, in booking order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (ParcelIdx, &Parcel)> {
        self.parcels
            .iter()
            .enumerate()
            .map(|(i, p)| (ParcelIdx(i as u32), p))
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}
