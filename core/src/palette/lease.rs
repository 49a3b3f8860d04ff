//! Time-bounded palette index allocation.
//!
//! A lease assigns a color to a palette index over a packet range.
//! Indices 0-7 are reserved for unlimited leases (colors that stay for
//! the rest of the export), 8-15 for time-limited ones. Each index
//! carries a chain of leases over time; the chain only grows, so a
//! released lease stays visible to inspection while no longer counting
//! as active.

use super::Rgb;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LeaseStatus {
    Active,
    Expired,
    Released,
}

/// One assignment of a color to a palette index over `start..end`.
#[derive(Clone, Debug)]
pub struct Lease {
    pub color: Rgb,
    pub start: u32,
    pub end: u32,
    pub status: LeaseStatus,
    pub label: String,
}

/// End packet for leases without a time bound.
pub const UNLIMITED: u32 = u32::MAX;

/// Per-index lease chains for one export run.
pub struct LeaseManager {
    chains: [Vec<Lease>; super::PALETTE_SIZE],
}

impl LeaseManager {
    pub fn new() -> Self {
        Self {
            chains: Default::default(),
        }
    }

    /// Lease a palette index for `color` starting at `now`.
    ///
    /// `duration` of `None` means unlimited (prefers indices 0-7);
    /// `Some(n)` leases `now..now + n` (prefers 8-15). A `preferred`
    /// index is tried first. Falls back to any free index; returns
    /// `None` when all sixteen are occupied at `now`.
    pub fn lease_color(
        &mut self,
        color: Rgb,
        duration: Option<u32>,
        preferred: Option<usize>,
        now: u32,
        label: &str,
    ) -> Option<usize> {
        let end = match duration {
            None => UNLIMITED,
            Some(n) => now.saturating_add(n),
        };

        let index = self.pick_index(duration.is_none(), preferred, now)?;
        self.chains[index].push(Lease {
            color,
            start: now,
            end,
            status: LeaseStatus::Active,
            label: label.to_string(),
        });
        Some(index)
    }

    fn pick_index(&self, unlimited: bool, preferred: Option<usize>, now: u32) -> Option<usize> {
        if let Some(idx) = preferred
            && idx < super::PALETTE_SIZE
            && self.is_free(idx, now)
        {
            return Some(idx);
        }

        // Preferred band first, then anything free.
        let band: [usize; 8] = if unlimited {
            [0, 1, 2, 3, 4, 5, 6, 7]
        } else {
            [8, 9, 10, 11, 12, 13, 14, 15]
        };
        if let Some(&idx) = band.iter().find(|&&idx| self.is_free(idx, now)) {
            return Some(idx);
        }
        (0..super::PALETTE_SIZE).find(|&idx| self.is_free(idx, now))
    }

    /// An index is free at `packet` when no chained lease is active there.
    pub fn is_free(&self, index: usize, packet: u32) -> bool {
        self.active_lease_at(index, packet).is_none()
    }

    /// The first chained lease covering `packet` with active status.
    pub fn active_lease_at(&self, index: usize, packet: u32) -> Option<&Lease> {
        self.chains[index]
            .iter()
            .find(|l| l.status == LeaseStatus::Active && l.start <= packet && packet < l.end)
    }

    /// Truncate the lease active at `packet` so it ends there. Unlike
    /// [`release`](Self::release) the record stays active for the
    /// packets it actually covered; used when a palette replacement
    /// takes over the index.
    pub fn supersede(&mut self, index: usize, packet: u32) {
        if let Some(lease) = self.chains[index]
            .iter_mut()
            .find(|l| l.status == LeaseStatus::Active && l.start <= packet && packet < l.end)
        {
            lease.end = packet;
        }
    }

    /// Release the lease active at `packet` on `index`, if any.
    pub fn release(&mut self, index: usize, packet: u32) {
        if let Some(lease) = self.chains[index]
            .iter_mut()
            .find(|l| l.status == LeaseStatus::Active && l.start <= packet && packet < l.end)
        {
            lease.status = LeaseStatus::Released;
        }
    }

    /// Mark every active lease whose range has passed `now` as expired.
    pub fn expire_stale(&mut self, now: u32) {
        for chain in &mut self.chains {
            for lease in chain.iter_mut() {
                if lease.status == LeaseStatus::Active && lease.end <= now {
                    lease.status = LeaseStatus::Expired;
                }
            }
        }
    }

    /// Full chain for an index, oldest first.
    pub fn chain(&self, index: usize) -> &[Lease] {
        &self.chains[index]
    }
}

impl Default for LeaseManager {
    fn default() -> Self {
        Self::new()
    }
}
