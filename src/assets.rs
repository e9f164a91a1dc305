//! Quad-grid meshes loaded from OBJ files
//!
//! The cannon body is a surface of revolution exported as a grid of quads,
//! `columns` quads per ring. Faces must be quads; texture coordinates are
//! derived from each quad's grid cell.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Errors from loading mesh assets
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("expected quad faces, found a face with {arity} corners")]
    NotQuads { arity: u32 },
    #[error("{quads} quads don't fill rows of {columns}")]
    GridShape { quads: usize, columns: usize },
    #[error("no faces in OBJ")]
    Empty,
}

/// A vertex ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Quads laid out row-major, `columns` per row
#[derive(Debug, Clone)]
pub struct MeshGrid {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    quads: Vec<[u32; 4]>,
    columns: usize,
}

// Corner offsets within a cell, in face winding order
const CORNER_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

impl MeshGrid {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.quads.len() / self.columns
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// The four corners of the quad at a grid cell
    pub fn quad_corners(&self, row: usize, col: usize) -> Option<[MeshVertex; 4]> {
        if col >= self.columns {
            return None;
        }
        let quad = self.quads.get(row * self.columns + col)?;
        let (cols, rows) = (self.columns as f32, self.rows() as f32);

        let mut corners = [MeshVertex {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0; 2],
        }; 4];
        for (corner, (&index, [du, dv])) in corners.iter_mut().zip(quad.iter().zip(CORNER_UV)) {
            let index = index as usize;
            corner.position = *self.positions.get(index)?;
            if let Some(normal) = self.normals.get(index) {
                corner.normal = *normal;
            }
            corner.uv = [(col as f32 + du) / cols, (row as f32 + dv) / rows];
        }
        Some(corners)
    }

    /// Every quad, row by row
    pub fn iter_quads(&self) -> impl Iterator<Item = [MeshVertex; 4]> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns).map(move |col| (row, col)))
            .filter_map(|(row, col)| self.quad_corners(row, col))
    }
}

/// Parse a quad-grid OBJ
pub fn load_mesh_grid(path: &Path, columns: usize) -> Result<MeshGrid, AssetError> {
    let input = std::fs::read_to_string(path)?;
    parse_mesh_grid(&input, columns)
}

pub fn parse_mesh_grid(input: &str, columns: usize) -> Result<MeshGrid, AssetError> {
    let load_opts = tobj::LoadOptions {
        triangulate: false,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj_buf(&mut input.as_bytes(), &load_opts, |_| {
        Ok((Vec::new(), Default::default()))
    })?;

    let mut grid = MeshGrid {
        positions: Vec::new(),
        normals: Vec::new(),
        quads: Vec::new(),
        columns,
    };
    for model in models {
        let mesh = model.mesh;
        if mesh.indices.is_empty() {
            continue;
        }
        // No arities means tobj saw only triangles
        if mesh.face_arities.is_empty() {
            return Err(AssetError::NotQuads { arity: 3 });
        }
        if let Some(&arity) = mesh.face_arities.iter().find(|&&a| a != 4) {
            return Err(AssetError::NotQuads { arity });
        }

        let base = grid.positions.len() as u32;
        grid.positions
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        grid.normals
            .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        grid.quads.extend(
            mesh.indices
                .chunks_exact(4)
                .map(|q| [base + q[0], base + q[1], base + q[2], base + q[3]]),
        );
    }

    if grid.quads.is_empty() {
        return Err(AssetError::Empty);
    }
    if columns == 0 || grid.quads.len() % columns != 0 {
        return Err(AssetError::GridShape {
            quads: grid.quads.len(),
            columns,
        });
    }
    log::info!("Mesh imported: {} rows x {} columns", grid.rows(), columns);
    Ok(grid)
}

/// A mesh loaded on first use; failure is logged once and remembered
#[derive(Debug)]
pub struct LazyMesh {
    path: PathBuf,
    columns: usize,
    slot: OnceCell<Option<MeshGrid>>,
}

impl LazyMesh {
    pub fn new(path: impl Into<PathBuf>, columns: usize) -> Self {
        Self {
            path: path.into(),
            columns,
            slot: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Option<&MeshGrid> {
        self.slot
            .get_or_init(|| match load_mesh_grid(&self.path, self.columns) {
                Ok(grid) => Some(grid),
                Err(err) => {
                    log::warn!("Could not load mesh {}: {err}", self.path.display());
                    None
                }
            })
            .as_ref()
    }
}
