//! Flat voxel grid holding one block id per cell

use glam::IVec3;
use thiserror::Error;
use tsumiki_blocks::Blocks;

/// Maximum addressable cell count. Packed scheduling events store positions
/// in 27 bits, so larger grids cannot be simulated.
pub const MAX_CELLS: usize = 1 << 27;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("grid volume {0} exceeds the {MAX_CELLS} addressable cells")]
    TooManyCells(usize),
    #[error("grid dimensions must all be non-zero")]
    EmptyDimensions,
    #[error("block buffer has {got} bytes, expected {expected}")]
    BufferSize { got: usize, expected: usize },
}

/// 3D block-type field with fixed dimensions, stored as a flat byte array.
///
/// Flat index layout is `(y * length + z) * width + x`, so `width * length`
/// is the stride between vertically adjacent cells.
pub struct VoxelGrid {
    width: usize,
    height: usize,
    length: usize,
    blocks: Vec<u8>,
}

impl VoxelGrid {
    /// Create an air-filled grid
    pub fn new(width: usize, height: usize, length: usize) -> Result<Self, WorldError> {
        Self::from_blocks(width, height, length, vec![0; width * height * length])
    }

    /// Create a grid from an existing block array (e.g. a generator's output)
    pub fn from_blocks(
        width: usize,
        height: usize,
        length: usize,
        blocks: Vec<u8>,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 || length == 0 {
            return Err(WorldError::EmptyDimensions);
        }
        let volume = width * height * length;
        if volume > MAX_CELLS {
            return Err(WorldError::TooManyCells(volume));
        }
        if blocks.len() != volume {
            return Err(WorldError::BufferSize {
                got: blocks.len(),
                expected: volume,
            });
        }
        Ok(Self {
            width,
            height,
            length,
            blocks,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Stride between a cell and the cell directly above it
    pub fn one_y(&self) -> usize {
        self.width * self.length
    }

    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && z < self.length);
        (y * self.length + z) * self.width + x
    }

    /// Unpack a flat index back into cell coordinates
    pub fn coords(&self, index: usize) -> IVec3 {
        let x = index % self.width;
        let z = (index / self.width) % self.length;
        let y = index / (self.width * self.length);
        IVec3::new(x as i32, y as i32, z as i32)
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= 0
            && (p.x as usize) < self.width
            && p.y >= 0
            && (p.y as usize) < self.height
            && p.z >= 0
            && (p.z as usize) < self.length
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.blocks[self.idx(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, block: u8) {
        let index = self.idx(x, y, z);
        self.blocks[index] = block;
    }

    pub fn get_index(&self, index: usize) -> u8 {
        self.blocks[index]
    }

    pub fn set_index(&mut self, index: usize, block: u8) {
        self.blocks[index] = block;
    }

    /// Classic heightmap sunlight: a cell is lit iff nothing above it in its
    /// column blocks light.
    pub fn is_lit(&self, blocks: &Blocks, x: usize, y: usize, z: usize) -> bool {
        for yy in (y + 1)..self.height {
            if blocks.blocks_light(self.get(x, yy, z)) {
                return false;
            }
        }
        true
    }
}
