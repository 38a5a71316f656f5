// Turn simulator
//
// `GameState` is a self-contained value: cloning it yields an independent
// speculative branch. `progress` consumes batches of six move codes and, for
// each batch, runs the movement, normal paint, special move and scoring
// phases in that order.

use log::trace;

use crate::error::SimError;
use crate::field::Field;
use crate::moves::MoveCode;
use crate::slots::{canonical_slot, team_of};
use crate::topology::field_coords;
use crate::types::{
    Agent, Cell, MoveStatus, Position, Snapshot, AGENTS, FIELD_SIZE, GRID, SCORING_START_TURN,
    TEAMS,
};

/// Cells advanced by a dash
const DASH_LENGTH: usize = 5;

/// Per-cell claim bits, scoped to one phase of one `progress` call
type ClaimBuffer = [u8; FIELD_SIZE];

/// Complete simulated game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    field: Field,
    agents: [Agent; AGENTS],
    turn: i32,
    score: [i32; TEAMS],
    last_moves: [i32; AGENTS],
}

impl GameState {
    /// Assembles a state from parts; area is taken from `field`
    pub fn from_parts(field: Field, agents: [Agent; AGENTS], turn: i32, score: [i32; TEAMS]) -> Self {
        GameState {
            field,
            agents,
            turn,
            score,
            last_moves: [-1; AGENTS],
        }
    }

    /// Loads an authoritative snapshot
    ///
    /// Area is recounted from the field rather than trusted from the wire.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SimError> {
        let mut cells = [Cell::EMPTY; FIELD_SIZE];
        for (face, rows) in snapshot.field.iter().enumerate() {
            for (row, cols) in rows.iter().enumerate() {
                for (col, pair) in cols.iter().enumerate() {
                    let index = (face * usize::from(GRID) + row) * usize::from(GRID) + col;
                    cells[index] = Cell::from_wire(*pair).ok_or_else(|| {
                        SimError::InvalidSnapshot(format!(
                            "cell ({}, {}, {}) has owner/intensity {:?}",
                            face, row, col, pair
                        ))
                    })?;
                }
            }
        }

        let mut agents = [Agent {
            position: Position::new(0, 0, 0, 0),
            special: 0,
        }; AGENTS];
        for (slot, raw) in snapshot.agent.iter().enumerate() {
            let position = position_from_wire(*raw).ok_or_else(|| {
                SimError::InvalidSnapshot(format!("agent {} has position {:?}", slot, raw))
            })?;
            agents[slot] = Agent {
                position,
                special: snapshot.special[slot],
            };
        }

        Ok(GameState {
            field: Field::from_cells(cells),
            agents,
            turn: snapshot.turn,
            score: snapshot.score,
            last_moves: snapshot.moves,
        })
    }

    /// Exports the state in the server's wire layout
    pub fn to_snapshot(&self) -> Snapshot {
        let mut field = [[[[-1, 0]; 5]; 5]; 6];
        for (index, cell) in self.field.cells().iter().enumerate() {
            let (face, row, col) = field_coords(index);
            field[usize::from(face)][usize::from(row)][usize::from(col)] = cell.to_wire();
        }
        let agent = self.agents.map(|a| {
            let p = a.position;
            [p.face, p.row, p.col, p.heading].map(i32::from)
        });

        Snapshot {
            status: MoveStatus::Ok,
            now: 0,
            turn: self.turn,
            moves: self.last_moves,
            score: self.score,
            field,
            agent,
            special: self.agents.map(|a| a.special),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn cell(&self, face: u8, row: u8, col: u8) -> Cell {
        self.field.cell_at(face, row, col)
    }

    pub fn agents(&self) -> &[Agent; AGENTS] {
        &self.agents
    }

    pub fn position(&self, slot: usize) -> Position {
        self.agents[slot].position
    }

    /// Remaining special moves of `slot`
    pub fn special(&self, slot: usize) -> i32 {
        self.agents[slot].special
    }

    pub fn area(&self) -> [i32; TEAMS] {
        self.field.area()
    }

    pub fn score(&self) -> [i32; TEAMS] {
        self.score
    }

    pub fn turn(&self) -> i32 {
        self.turn
    }

    /// Codes applied on the most recent turn, in global slot order
    pub fn last_moves(&self) -> [i32; AGENTS] {
        self.last_moves
    }

    /// Advances the game by `moves.len() / 6` turns
    ///
    /// Each batch of six codes is in global slot order. The whole sequence is
    /// validated first; on error no turn is applied.
    pub fn progress(&mut self, moves: &[i32]) -> Result<(), SimError> {
        self.progress_as(0, moves)
    }

    /// Like [`GameState::progress`], with batches written in `member_id`'s
    /// local slot order
    pub fn progress_as(&mut self, member_id: usize, moves: &[i32]) -> Result<(), SimError> {
        let batches = decode_batches(member_id, moves)?;
        let mut claims: ClaimBuffer = [0; FIELD_SIZE];
        for (codes, decoded) in batches.iter() {
            self.run_turn(*codes, decoded, &mut claims);
        }
        Ok(())
    }

    fn run_turn(&mut self, codes: [i32; AGENTS], batch: &[MoveCode; AGENTS], claims: &mut ClaimBuffer) {
        self.last_moves = codes;

        let destinations = self.move_agents(batch, claims);
        self.resolve_normal_paint(batch, &destinations, claims);
        self.resolve_special_moves(batch, claims);

        if self.turn >= SCORING_START_TURN {
            self.add_score();
        }

        trace!(
            "turn {} -> {}: moves {:?}, area {:?}, score {:?}",
            self.turn,
            self.turn + 1,
            codes,
            self.field.area(),
            self.score
        );
        self.turn += 1;
    }

    /// Movement phase: every normal mover rotates and steps, claiming its
    /// destination with its slot bit
    fn move_agents(&mut self, batch: &[MoveCode; AGENTS], claims: &mut ClaimBuffer) -> [usize; AGENTS] {
        let mut destinations = [0usize; AGENTS];
        for (slot, code) in batch.iter().enumerate() {
            if let MoveCode::Step { rotation } = *code {
                let agent = &mut self.agents[slot];
                agent.position = agent.position.advance(rotation);
                destinations[slot] = agent.position.index();
                claims[destinations[slot]] |= 1 << slot;
            }
        }
        destinations
    }

    fn resolve_normal_paint(
        &mut self,
        batch: &[MoveCode; AGENTS],
        destinations: &[usize; AGENTS],
        claims: &mut ClaimBuffer,
    ) {
        for (slot, code) in batch.iter().enumerate() {
            if !matches!(code, MoveCode::Step { .. }) {
                continue;
            }
            let team = team_of(slot);
            let index = destinations[slot];
            if is_uncontested(claims[index], slot, team) || self.field.cell(index).is_owned_by(team) {
                self.field.soft_paint(team, index);
            }
        }

        for (slot, code) in batch.iter().enumerate() {
            if matches!(code, MoveCode::Step { .. }) {
                claims[destinations[slot]] = 0;
            }
        }
    }

    /// Special phase: traversals claim cells with team bits; a cell claimed by
    /// exactly one team is force painted for it
    fn resolve_special_moves(&mut self, batch: &[MoveCode; AGENTS], claims: &mut ClaimBuffer) {
        let mut touched: Vec<usize> = Vec::new();

        for (slot, code) in batch.iter().enumerate() {
            let team = team_of(slot);
            match *code {
                MoveCode::Dash { rotation } => {
                    self.agents[slot].special -= 1;
                    let mut position = self.agents[slot].position.rotate(rotation);
                    for _ in 0..DASH_LENGTH {
                        position = position.step();
                        claim_for_team(claims, &mut touched, position.index(), team);
                    }
                    self.agents[slot].position = position;
                }
                MoveCode::Warp { face, row, col } => {
                    self.agents[slot].special -= 1;
                    let face = canonical_slot(usize::from(team), usize::from(face)) as u8;
                    let center = Position::new(face, row, col, 0);
                    claim_for_team(claims, &mut touched, center.index(), team);
                    for heading in 0..4 {
                        let arm = Position { heading, ..center }.step();
                        claim_for_team(claims, &mut touched, arm.index(), team);
                    }
                    self.agents[slot].position = center;
                }
                MoveCode::Stay | MoveCode::Step { .. } => {}
            }
        }

        for index in touched {
            let bits = claims[index];
            if bits.count_ones() == 1 {
                self.field.force_paint(bits.trailing_zeros() as u8, index);
            }
            claims[index] = 0;
        }
    }

    /// Adds every team's current area to its score
    fn add_score(&mut self) {
        let area = self.field.area();
        for (score, owned) in self.score.iter_mut().zip(area.iter()) {
            *score += owned;
        }
    }
}

/// A normal mover owns its destination when no other slot claimed it, or when
/// the only other claim is the slot numbered like the mover's team
fn is_uncontested(bits: u8, slot: usize, team: u8) -> bool {
    bits == 1 << slot || bits == (1 << slot) | (1 << team)
}

fn claim_for_team(claims: &mut ClaimBuffer, touched: &mut Vec<usize>, index: usize, team: u8) {
    if claims[index] == 0 {
        touched.push(index);
    }
    claims[index] |= 1 << team;
}

fn position_from_wire(raw: [i32; 4]) -> Option<Position> {
    let [face, row, col, heading] = raw;
    let position = Position::new(
        u8::try_from(face).ok()?,
        u8::try_from(row).ok()?,
        u8::try_from(col).ok()?,
        u8::try_from(heading).ok()?,
    );
    if position.is_valid() {
        Some(position)
    } else {
        None
    }
}

/// Splits and decodes a move sequence into global-order batches
fn decode_batches(
    member_id: usize,
    moves: &[i32],
) -> Result<Vec<([i32; AGENTS], [MoveCode; AGENTS])>, SimError> {
    if moves.len() % AGENTS != 0 {
        return Err(SimError::MalformedBatch { len: moves.len() });
    }

    let mut batches = Vec::with_capacity(moves.len() / AGENTS);
    for (batch_index, chunk) in moves.chunks_exact(AGENTS).enumerate() {
        let mut codes = [-1; AGENTS];
        let mut decoded = [MoveCode::Stay; AGENTS];
        for slot in 0..AGENTS {
            // the code for global slot `slot` sits at the permuted position
            let local = canonical_slot(member_id, slot);
            let code = chunk[local];
            decoded[slot] = MoveCode::from_code(code).ok_or(SimError::InvalidMoveCode {
                position: batch_index * AGENTS + local,
                code,
            })?;
            codes[slot] = code;
        }
        batches.push((codes, decoded));
    }
    Ok(batches)
}
