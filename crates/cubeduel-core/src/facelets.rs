//! Facelet string decoding.
//!
//! The server describes a cube as 54 sticker letters, nine per face, faces in
//! `U D L R F B` order. [`decode`] is total: short input is padded with
//! [`UNKNOWN_MARKER`], long input is truncated, and characters outside the
//! colour alphabet are kept as-is and render as [`Sticker::Unknown`].
//!
//! Lengths are counted in characters, not bytes.

use std::fmt;

/// Stickers on a whole cube.
pub const FACELET_COUNT: usize = 54;

/// Stickers on one face.
pub const FACE_SIZE: usize = 9;

/// Padding character for missing stickers.
pub const UNKNOWN_MARKER: char = '.';

/// Face names in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceName {
    /// Up
    U,
    /// Down
    D,
    /// Left
    L,
    /// Right
    R,
    /// Front
    F,
    /// Back
    B,
}

impl FaceName {
    /// Every face, in wire order.
    pub const ALL: [Self; 6] = [Self::U, Self::D, Self::L, Self::R, Self::F, Self::B];

    /// Single-letter name.
    pub fn as_char(self) -> char {
        match self {
            Self::U => 'U',
            Self::D => 'D',
            Self::L => 'L',
            Self::R => 'R',
            Self::F => 'F',
            Self::B => 'B',
        }
    }
}

impl fmt::Display for FaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Nine stickers, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face([char; FACE_SIZE]);

impl Face {
    /// Face with every sticker unknown.
    pub const fn unknown() -> Self {
        Self([UNKNOWN_MARKER; FACE_SIZE])
    }

    /// Raw characters.
    pub fn chars(&self) -> &[char; FACE_SIZE] {
        &self.0
    }

    /// The nine characters as a string.
    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }

    /// Three rows of three.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.0.chunks(3)
    }

    /// Stickers in row-major order.
    pub fn stickers(&self) -> impl Iterator<Item = Sticker> + '_ {
        self.0.iter().map(|&c| Sticker::from_char(c))
    }
}

impl Default for Face {
    fn default() -> Self {
        Self::unknown()
    }
}

/// All six faces of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Faces {
    /// Up
    pub u: Face,
    /// Down
    pub d: Face,
    /// Left
    pub l: Face,
    /// Right
    pub r: Face,
    /// Front
    pub f: Face,
    /// Back
    pub b: Face,
}

impl Faces {
    /// Face by name.
    pub fn get(&self, name: FaceName) -> &Face {
        match name {
            FaceName::U => &self.u,
            FaceName::D => &self.d,
            FaceName::L => &self.l,
            FaceName::R => &self.r,
            FaceName::F => &self.f,
            FaceName::B => &self.b,
        }
    }

    /// Faces in wire order, with their names.
    pub fn iter(&self) -> impl Iterator<Item = (FaceName, &Face)> {
        FaceName::ALL.into_iter().map(|name| (name, self.get(name)))
    }
}

/// Split a facelet string into six faces.
pub fn decode(facelets: &str) -> Faces {
    let mut padded = [UNKNOWN_MARKER; FACELET_COUNT];
    for (slot, c) in padded.iter_mut().zip(facelets.chars()) {
        *slot = c;
    }

    let mut faces = [Face::unknown(); 6];
    for (face, chunk) in faces.iter_mut().zip(padded.chunks_exact(FACE_SIZE)) {
        face.0.copy_from_slice(chunk);
    }

    let [u, d, l, r, f, b] = faces;
    Faces { u, d, l, r, f, b }
}

/// Sticker colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sticker {
    /// `W`
    White,
    /// `Y`
    Yellow,
    /// `O`
    Orange,
    /// `R`
    Red,
    /// `G`
    Green,
    /// `B`
    Blue,
    /// `.` or anything unrecognized.
    Unknown,
}

impl Sticker {
    /// Map a facelet character. Total.
    pub fn from_char(c: char) -> Self {
        match c {
            'W' => Self::White,
            'Y' => Self::Yellow,
            'O' => Self::Orange,
            'R' => Self::Red,
            'G' => Self::Green,
            'B' => Self::Blue,
            _ => Self::Unknown,
        }
    }

    /// RGB colour as `#rrggbb`.
    pub fn hex(self) -> &'static str {
        match self {
            Self::White => "#ffffff",
            Self::Yellow => "#ffd500",
            Self::Orange => "#ff8c00",
            Self::Red => "#d30000",
            Self::Green => "#00a651",
            Self::Blue => "#0057b7",
            Self::Unknown => "#111111",
        }
    }

    /// Character used in text rendering.
    pub fn glyph(self) -> char {
        match self {
            Self::White => 'W',
            Self::Yellow => 'Y',
            Self::Orange => 'O',
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Unknown => UNKNOWN_MARKER,
        }
    }
}

/// Shorthand for [`Sticker::from_char`].
pub fn sticker(c: char) -> Sticker {
    Sticker::from_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_six_faces(faces: &Faces) {
        for (_, face) in faces.iter() {
            assert_eq!(face.as_string().chars().count(), FACE_SIZE);
        }
    }

    #[test]
    fn empty_input_is_all_unknown() {
        let faces = decode("");
        assert_six_faces(&faces);
        assert!(faces.iter().all(|(_, f)| *f == Face::unknown()));
    }

    #[test]
    fn short_input_is_padded() {
        let faces = decode("WYOR");
        assert_six_faces(&faces);
        assert_eq!(faces.u.as_string(), "WYOR.....");
        assert_eq!(faces.b.as_string(), ".........");
    }

    #[test]
    fn long_input_is_truncated() {
        let input: String = "UUUUUUUUUDDDDDDDDDLLLLLLLLLRRRRRRRRRFFFFFFFFFBBBBBBBBBXXXXXXXXXXXXXXXX".into();
        assert_eq!(input.chars().count(), 70);

        let faces = decode(&input);
        assert_six_faces(&faces);
        for (name, face) in faces.iter() {
            assert_eq!(face.as_string(), name.as_char().to_string().repeat(FACE_SIZE));
        }
    }

    #[test]
    fn solved_cube_maps_to_colours() {
        let solved = "WWWWWWWWWYYYYYYYYYOOOOOOOOORRRRRRRRRGGGGGGGGGBBBBBBBBB";
        let faces = decode(solved);
        assert!(faces.u.stickers().all(|s| s == Sticker::White));
        assert!(faces.f.stickers().all(|s| s == Sticker::Green));
        assert_eq!(faces.get(FaceName::B).stickers().next(), Some(Sticker::Blue));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let faces = decode("ééé");
        assert_eq!(faces.u.as_string(), "ééé......");
        assert!(faces.u.stickers().all(|s| s == Sticker::Unknown));
    }

    #[test]
    fn rows_are_three_by_three() {
        let faces = decode("WYORGBWYO");
        let rows: Vec<String> = faces.u.rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows, vec!["WYO", "RGB", "WYO"]);
    }

    #[test]
    fn sticker_mapping() {
        assert_eq!(sticker('W').hex(), "#ffffff");
        assert_eq!(sticker('B').hex(), "#0057b7");
        assert_eq!(sticker('.'), Sticker::Unknown);
        assert_eq!(sticker('x'), Sticker::Unknown);
        assert_eq!(sticker('x').hex(), "#111111");
        assert_eq!(sticker('w'), Sticker::Unknown);
        assert_eq!(Sticker::Unknown.glyph(), '.');
    }
}
