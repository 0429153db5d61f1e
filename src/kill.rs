//! The move-then-delete ("kill") transaction.
//!
//! Converts "move every cursor, then delete everything swept over" into one
//! atomic operation: snapshot the cursors, run the motion, then pair old and
//! new positions into deletion regions. When any region starts inside its
//! predecessor the whole transaction aborts and the original cursors come
//! back untouched. Works synchronously or parked in the view state while a
//! modal prompt gathers input (zap-to-char).

use crate::buffer::TextView;
use crate::kill_ring::KillRing;
use crate::region::Region;

/// Result of finishing a kill transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// Text was captured and deleted
    Killed { regions: usize, bytes: usize },
    /// Regions collided; everything was restored and nothing deleted
    Aborted,
}

/// In-flight kill transaction. See the module docs.
#[derive(Debug, Clone)]
pub struct MoveThenDeleteHelper {
    orig: Vec<Region>,
    /// Kill direction, tagged onto the ring entry
    pub forward: bool,
    /// Whether the captured text coalesces with the previous ring entry,
    /// decided when the transaction opens
    pub join: bool,
}

impl MoveThenDeleteHelper {
    /// Open a transaction: snapshot the current cursors.
    pub fn new<B: TextView + ?Sized>(view: &B) -> Self {
        Self {
            orig: view.cursors().to_vec(),
            forward: true,
            join: false,
        }
    }

    /// The snapshot taken at open.
    pub fn orig_cursors(&self) -> &[Region] {
        &self.orig
    }

    /// Close the transaction against the view's current (post-motion)
    /// cursors.
    ///
    /// Old and new cursors pair up by index; each pair spans the swept
    /// region regardless of which end moved. The overlap check compares
    /// each region with its immediate predecessor in document order,
    /// counting a shared boundary as a collision.
    pub fn finish<B: TextView + ?Sized>(
        self,
        view: &mut B,
        ring: &mut KillRing,
        join: bool,
    ) -> KillOutcome {
        let new_cursors = view.cursors().to_vec();

        let mut regions: Vec<Region> = self
            .orig
            .iter()
            .zip(new_cursors.iter())
            .map(|(old, new)| {
                if (old.begin(), old.end()) < (new.begin(), new.end()) {
                    Region::new(old.begin(), new.end())
                } else {
                    Region::new(new.begin(), old.end())
                }
            })
            .collect();
        regions.sort_by_key(|r| (r.begin(), r.end()));

        for i in 1..regions.len() {
            if regions[i - 1].contains(regions[i].begin()) {
                view.set_cursors(self.orig);
                return KillOutcome::Aborted;
            }
        }

        let texts: Vec<String> = regions.iter().map(|r| view.substr(*r)).collect();
        let bytes = texts.iter().map(|t| t.len()).sum();
        ring.add(texts, self.forward, join);

        for region in regions.iter().rev() {
            view.erase(*region);
        }

        // collapse each cursor to where its region used to start, shifted
        // left by everything erased before it
        let mut removed = 0;
        let cursors = regions
            .iter()
            .map(|r| {
                let pos = r.begin() - removed;
                removed += r.size();
                Region::point(pos)
            })
            .collect();
        view.set_cursors(cursors);

        KillOutcome::Killed {
            regions: regions.len(),
            bytes,
        }
    }
}
