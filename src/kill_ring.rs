//! Kill ring - a bounded history of killed (deleted) text.
//!
//! Each entry is multi-part: one part per cursor that participated in the
//! kill. Consecutive kills coalesce into a single entry so that, e.g.,
//! repeated kill-word builds up one yankable chunk. Killing backward
//! prepends to the entry instead of appending.

const DEFAULT_CAPACITY: usize = 64;

/// One kill-ring entry: one text part per cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillEntry {
    pub parts: Vec<String>,
}

/// Bounded ring of kill entries with a yank position.
#[derive(Debug)]
pub struct KillRing {
    entries: Vec<KillEntry>,
    /// Index of the entry the next yank returns.
    current: usize,
    capacity: usize,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl KillRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add one kill to the ring. `regions` holds one string per cursor.
    ///
    /// When `join` is set (the previous command was also a kill) the new text
    /// coalesces with the newest entry: appended for a forward kill,
    /// prepended for a backward one. Empty kills are ignored.
    pub fn add(&mut self, regions: Vec<String>, forward: bool, join: bool) {
        if regions.iter().all(|r| r.is_empty()) {
            return;
        }

        if join {
            if let Some(last) = self.entries.last_mut() {
                if last.parts.len() == regions.len() {
                    for (part, new) in last.parts.iter_mut().zip(regions) {
                        if forward {
                            part.push_str(&new);
                        } else {
                            part.insert_str(0, &new);
                        }
                    }
                    self.current = self.entries.len() - 1;
                    return;
                }
            }
        }

        self.entries.push(KillEntry { parts: regions });
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.current = self.entries.len() - 1;
    }

    /// Fetch text for a yank over `n` cursors.
    ///
    /// A non-zero `pop` first moves the yank position back through history
    /// (yank-pop). When the entry's part count matches the cursor count each
    /// cursor gets its own part; otherwise every cursor receives the whole
    /// entry joined with newlines.
    pub fn get_current(&mut self, n: usize, pop: i64) -> Option<Vec<String>> {
        if self.entries.is_empty() || n == 0 {
            return None;
        }

        if pop != 0 {
            let len = self.entries.len() as i64;
            let mut idx = self.current as i64 - pop;
            idx = ((idx % len) + len) % len;
            self.current = idx as usize;
        }

        let entry = &self.entries[self.current];
        if entry.parts.len() == n {
            Some(entry.parts.clone())
        } else {
            let joined = entry.parts.join("\n");
            Some(vec![joined; n])
        }
    }

}
