//! Decoded terrain chunks.

use std::fmt;
use std::ops::Add;

use crate::coords::wire_to_internal;

/// Integer coordinate in internal axes, used both as an origin and as an
/// extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Build from a wire-axis triple.
    pub fn from_wire(x: i32, y: i32, z: i32) -> Self {
        let (x, y, z) = wire_to_internal(x, y, z);
        Self { x, y, z }
    }

    /// Number of cells spanned when used as an extent.
    pub fn volume(&self) -> usize {
        self.x.unsigned_abs() as usize * self.y.unsigned_abs() as usize * self.z.unsigned_abs() as usize
    }
}

impl Add for ChunkCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One cell of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub block_type: u8,
}

/// A dense box of blocks.
///
/// `size` may be negative on an axis: the chunk then extends from its origin
/// toward that axis' negative side, and valid relative coordinates on it are
/// `size+1 ..= 0`. This happens on the north axis, which is the negated wire
/// x axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    origin: ChunkCoord,
    size: ChunkCoord,
    blocks: Vec<Block>,
}

/// Offset of `rel` along an axis of signed `extent`, if inside.
fn axis_offset(rel: i32, extent: i32) -> Option<usize> {
    if extent >= 0 {
        (0..extent).contains(&rel).then_some(rel as usize)
    } else {
        (extent + 1..=0).contains(&rel).then_some(rel.unsigned_abs() as usize)
    }
}

/// Relative coordinate at `offset` along an axis of signed `extent`.
fn axis_rel(offset: usize, extent: i32) -> i32 {
    if extent >= 0 {
        offset as i32
    } else {
        -(offset as i32)
    }
}

impl Chunk {
    /// Create a chunk filled with air (block type 0).
    pub fn new(origin: ChunkCoord, size: ChunkCoord) -> Self {
        Self {
            origin,
            size,
            blocks: vec![Block::default(); size.volume()],
        }
    }

    pub fn origin(&self) -> ChunkCoord {
        self.origin
    }

    pub fn size(&self) -> ChunkCoord {
        self.size
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn index(&self, rel: ChunkCoord) -> Option<usize> {
        let ix = axis_offset(rel.x, self.size.x)?;
        let iy = axis_offset(rel.y, self.size.y)?;
        let iz = axis_offset(rel.z, self.size.z)?;
        let dy = self.size.y.unsigned_abs() as usize;
        let dz = self.size.z.unsigned_abs() as usize;
        Some((ix * dy + iy) * dz + iz)
    }

    /// Block at a relative coordinate.
    pub fn block(&self, rel: ChunkCoord) -> Option<&Block> {
        self.index(rel).map(|i| &self.blocks[i])
    }

    pub fn block_mut(&mut self, rel: ChunkCoord) -> Option<&mut Block> {
        self.index(rel).map(move |i| &mut self.blocks[i])
    }

    /// World coordinate of a relative coordinate.
    pub fn absolute(&self, rel: ChunkCoord) -> ChunkCoord {
        self.origin + rel
    }

    /// Every cell with its relative coordinate.
    pub fn cells(&self) -> impl Iterator<Item = (ChunkCoord, &Block)> + '_ {
        let dy = self.size.y.unsigned_abs() as usize;
        let dz = self.size.z.unsigned_abs() as usize;
        self.blocks.iter().enumerate().map(move |(i, block)| {
            let iz = i % dz;
            let iy = (i / dz) % dy;
            let ix = i / (dz * dy);
            let rel = ChunkCoord::new(
                axis_rel(ix, self.size.x),
                axis_rel(iy, self.size.y),
                axis_rel(iz, self.size.z),
            );
            (rel, block)
        })
    }
}
