// Agent slot bookkeeping
//
// Slots 0..6 pair into three teams through a mirrored table, and every
// participant addresses the six slots (and the six faces) through its own
// fixed relabeling.

use crate::types::AGENTS;

/// Team owning each slot
pub const TEAM_OF_SLOT: [u8; AGENTS] = [0, 1, 2, 2, 1, 0];

/// Team that owns `slot`
pub fn team_of(slot: usize) -> u8 {
    TEAM_OF_SLOT[slot]
}

/// The other slot on the same team
pub fn partner_of(slot: usize) -> usize {
    AGENTS - 1 - slot
}

/// Both slots of `team`, lower slot first
pub fn slots_of_team(team: u8) -> [usize; 2] {
    let t = usize::from(team);
    [t, partner_of(t)]
}

/// Maps a participant's local slot onto the shared global slot
///
/// Also used for faces: a warp target face is named in the mover's frame and
/// mapped through the team id.
pub fn canonical_slot(member_id: usize, local_slot: usize) -> usize {
    let (i0, i1) = (member_id / 3, member_id % 3);
    let (j0, j1) = (local_slot / 3, local_slot % 3);
    ((j0 + 1) * i1 + j1) % 3 + (i0 + j0) % 2 * 3
}
