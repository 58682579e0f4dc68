//! Authoritative cube model for the simulated server.
//!
//! Stickers are stored per face as 3x3 grids and serialized in
//! `U D L R F B` order, the same layout the client decodes.

use cubeduel_core::FaceName;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scramble length used when a match starts.
pub const SCRAMBLE_LENGTH: usize = 20;

/// How far a face turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Amount {
    /// Quarter turn clockwise.
    Quarter,
    /// Half turn.
    Half,
    /// Quarter turn counter-clockwise.
    Prime,
}

impl Amount {
    fn quarter_turns(self) -> usize {
        match self {
            Self::Quarter => 1,
            Self::Half => 2,
            Self::Prime => 3,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Quarter => "",
            Self::Half => "2",
            Self::Prime => "'",
        }
    }
}

/// Axis a face turns around. Consecutive scramble turns never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `L` and `R`.
    X,
    /// `U` and `D`.
    Y,
    /// `F` and `B`.
    Z,
}

/// A single face turn in standard notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    /// Face being turned.
    pub face: FaceName,
    /// Turn amount.
    pub amount: Amount,
}

impl Turn {
    /// All eighteen face turns.
    pub const ALL: [Turn; 18] = {
        const AMOUNTS: [Amount; 3] = [Amount::Quarter, Amount::Prime, Amount::Half];
        let mut all = [Turn { face: FaceName::U, amount: Amount::Quarter }; 18];
        let mut i = 0;
        while i < 18 {
            all[i] = Turn { face: FaceName::ALL[i / 3], amount: AMOUNTS[i % 3] };
            i += 1;
        }
        all
    };

    /// Parse notation such as `R`, `U'` or `F2`. Surrounding whitespace is
    /// ignored.
    pub fn parse(notation: &str) -> Option<Self> {
        let notation = notation.trim();
        let mut chars = notation.chars();
        let face = match chars.next()? {
            'U' => FaceName::U,
            'D' => FaceName::D,
            'L' => FaceName::L,
            'R' => FaceName::R,
            'F' => FaceName::F,
            'B' => FaceName::B,
            _ => return None,
        };
        let amount = match chars.as_str() {
            "" => Amount::Quarter,
            "'" => Amount::Prime,
            "2" => Amount::Half,
            _ => return None,
        };
        Some(Self { face, amount })
    }

    /// Standard notation.
    pub fn notation(self) -> String {
        format!("{}{}", self.face.as_char(), self.amount.suffix())
    }

    /// The turn that undoes this one.
    pub fn inverse(self) -> Self {
        let amount = match self.amount {
            Amount::Quarter => Amount::Prime,
            Amount::Prime => Amount::Quarter,
            Amount::Half => Amount::Half,
        };
        Self { face: self.face, amount }
    }

    /// Axis this turn rotates around.
    pub fn axis(self) -> Axis {
        match self.face {
            FaceName::U | FaceName::D => Axis::Y,
            FaceName::L | FaceName::R => Axis::X,
            FaceName::F | FaceName::B => Axis::Z,
        }
    }
}

/// Generate a scramble from a seed.
///
/// Two consecutive turns never share an axis.
pub fn scramble(seed: u64, length: usize) -> Vec<Turn> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut turns: Vec<Turn> = Vec::with_capacity(length);

    while turns.len() < length {
        let turn = Turn::ALL[rng.gen_range(0..Turn::ALL.len())];
        if turns.last().is_some_and(|last| last.axis() == turn.axis()) {
            continue;
        }
        turns.push(turn);
    }
    turns
}

type Grid = [[char; 3]; 3];

const U: usize = 0;
const R: usize = 1;
const F: usize = 2;
const D: usize = 3;
const L: usize = 4;
const B: usize = 5;

/// Serialization order of the internal faces.
const WIRE_ORDER: [usize; 6] = [U, D, L, R, F, B];

/// A 3x3 cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeModel {
    faces: [Grid; 6],
}

impl Default for CubeModel {
    fn default() -> Self {
        Self::solved()
    }
}

impl CubeModel {
    /// A solved cube: white up, green front.
    pub fn solved() -> Self {
        let mut faces = [[[' '; 3]; 3]; 6];
        for (face, color) in [(U, 'W'), (R, 'R'), (F, 'G'), (D, 'Y'), (L, 'O'), (B, 'B')] {
            faces[face] = [[color; 3]; 3];
        }
        Self { faces }
    }

    /// A solved cube with `turns` applied.
    pub fn scrambled(turns: &[Turn]) -> Self {
        let mut cube = Self::solved();
        for turn in turns {
            cube.apply(*turn);
        }
        cube
    }

    /// Apply one turn.
    pub fn apply(&mut self, turn: Turn) {
        for _ in 0..turn.amount.quarter_turns() {
            match turn.face {
                FaceName::U => self.turn_u(),
                FaceName::D => self.turn_d(),
                FaceName::L => self.turn_l(),
                FaceName::R => self.turn_r(),
                FaceName::F => self.turn_f(),
                FaceName::B => self.turn_b(),
            }
        }
    }

    /// Whether every face is a single color.
    pub fn is_solved(&self) -> bool {
        self.faces.iter().all(|grid| {
            let center = grid[0][0];
            grid.iter().flatten().all(|&c| c == center)
        })
    }

    /// 54-character sticker string in `U D L R F B` order.
    pub fn facelets(&self) -> String {
        WIRE_ORDER.iter().flat_map(|&face| self.faces[face].iter().flatten()).collect()
    }

    fn rotate_clockwise(&mut self, face: usize) {
        let old = self.faces[face];
        for (r, row) in old.iter().enumerate() {
            for (c, &sticker) in row.iter().enumerate() {
                self.faces[face][c][2 - r] = sticker;
            }
        }
    }

    fn turn_u(&mut self) {
        self.rotate_clockwise(U);
        let f = &mut self.faces;
        let front = f[F][0];
        f[F][0] = f[R][0];
        f[R][0] = f[B][0];
        f[B][0] = f[L][0];
        f[L][0] = front;
    }

    fn turn_d(&mut self) {
        self.rotate_clockwise(D);
        let f = &mut self.faces;
        let front = f[F][2];
        f[F][2] = f[L][2];
        f[L][2] = f[B][2];
        f[B][2] = f[R][2];
        f[R][2] = front;
    }

    fn turn_r(&mut self) {
        self.rotate_clockwise(R);
        let f = &mut self.faces;
        let up = [f[U][0][2], f[U][1][2], f[U][2][2]];
        for i in 0..3 {
            f[U][i][2] = f[F][i][2];
            f[F][i][2] = f[D][i][2];
            f[D][i][2] = f[B][2 - i][0];
            f[B][2 - i][0] = up[i];
        }
    }

    fn turn_l(&mut self) {
        self.rotate_clockwise(L);
        let f = &mut self.faces;
        let up = [f[U][0][0], f[U][1][0], f[U][2][0]];
        for i in 0..3 {
            f[U][i][0] = f[B][2 - i][2];
            f[B][2 - i][2] = f[D][i][0];
            f[D][i][0] = f[F][i][0];
            f[F][i][0] = up[i];
        }
    }

    fn turn_f(&mut self) {
        self.rotate_clockwise(F);
        let f = &mut self.faces;
        let up = f[U][2];
        for i in 0..3 {
            f[U][2][i] = f[L][2 - i][2];
        }
        for i in 0..3 {
            f[L][i][2] = f[D][0][i];
        }
        for i in 0..3 {
            f[D][0][i] = f[R][2 - i][0];
        }
        for i in 0..3 {
            f[R][i][0] = up[i];
        }
    }

    fn turn_b(&mut self) {
        self.rotate_clockwise(B);
        let f = &mut self.faces;
        let up = f[U][0];
        for i in 0..3 {
            f[U][0][i] = f[R][i][2];
        }
        for i in 0..3 {
            f[R][i][2] = f[D][2][2 - i];
        }
        for i in 0..3 {
            f[D][2][i] = f[L][i][0];
        }
        for i in 0..3 {
            f[L][i][0] = up[2 - i];
        }
    }
}
