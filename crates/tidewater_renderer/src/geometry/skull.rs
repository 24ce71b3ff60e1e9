//! Loader for the skull model's plain-text format.
//!
//! The format is a header (`VertexCount: N`, `TriangleCount: M`) followed
//! by a brace-delimited vertex list (position + normal per line) and a
//! brace-delimited triangle index list. The model carries no texture
//! coordinates; UVs are left at the origin and the material supplies the
//! look.

use std::path::Path;

use anyhow::{bail, Context as _};
use glam::Vec3;

use super::{MeshData, Vertex};

/// Reads and parses a skull model file.
///
/// A missing or malformed file is a content error: callers are expected to
/// log it and continue without the geometry (see the scene builder).
pub fn load_skull(path: &Path) -> anyhow::Result<MeshData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading model file {}", path.display()))?;
    parse_skull(&text).with_context(|| format!("parsing model file {}", path.display()))
}

/// Parses the text format into a single-submesh [`MeshData`] named
/// `"skull"`.
pub fn parse_skull(text: &str) -> anyhow::Result<MeshData> {
    let mut tokens = text
        .split_whitespace()
        .filter(|t| *t != "{" && *t != "}");

    let mut expect_header = |name: &str| -> anyhow::Result<usize> {
        match tokens.next() {
            Some(t) if t.trim_end_matches(':') == name => {}
            other => bail!("expected `{name}:`, found {other:?}"),
        }
        tokens
            .next()
            .context("missing count")?
            .parse::<usize>()
            .context("bad count")
    };

    let vertex_count = expect_header("VertexCount")?;
    let triangle_count = expect_header("TriangleCount")?;

    // skip the list section labels ("VertexList", "(pos," ... up to the
    // first numeric token)
    let mut tokens = tokens.skip_while(|t| t.parse::<f32>().is_err());

    fn next_f32<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<f32> {
        tokens
            .next()
            .context("vertex data truncated")?
            .parse::<f32>()
            .context("bad float in vertex list")
    }

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let position = Vec3::new(
            next_f32(&mut tokens)?,
            next_f32(&mut tokens)?,
            next_f32(&mut tokens)?,
        );
        let normal = Vec3::new(
            next_f32(&mut tokens)?,
            next_f32(&mut tokens)?,
            next_f32(&mut tokens)?,
        );
        vertices.push(Vertex::new(position, normal, [0.0, 0.0]));
    }

    // skip the "TriangleList" label
    let tokens = tokens.skip_while(|t| t.parse::<u32>().is_err());

    let mut indices = Vec::with_capacity(triangle_count * 3);
    for t in tokens {
        indices.push(t.parse::<u32>().context("bad index in triangle list")?);
    }
    if indices.len() != triangle_count * 3 {
        bail!(
            "index count mismatch: header says {} triangles, file has {} indices",
            triangle_count,
            indices.len()
        );
    }
    if let Some(&max) = indices.iter().max() {
        if max as usize >= vertices.len() {
            bail!("index {max} out of range for {} vertices", vertices.len());
        }
    }

    Ok(MeshData::with_single_submesh("skull", vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
VertexCount: 4
TriangleCount: 2
VertexList (pos, normal)
{
 0.0 0.0 0.0  0.0 1.0 0.0
 1.0 0.0 0.0  0.0 1.0 0.0
 1.0 0.0 1.0  0.0 1.0 0.0
 0.0 0.0 1.0  0.0 1.0 0.0
}
TriangleList
{
 0 1 2
 0 2 3
}
";

    #[test]
    fn parses_well_formed_file() {
        let mesh = parse_skull(SAMPLE).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        let sub = mesh.submesh("skull").unwrap();
        assert_eq!(sub.index_count, 6);
        assert_eq!(sub.bounds.max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn rejects_truncated_triangle_list() {
        let broken = SAMPLE.replace("0 2 3", "");
        assert!(parse_skull(&broken).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let broken = SAMPLE.replace("0 2 3", "0 2 9");
        assert!(parse_skull(&broken).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_skull(Path::new("does/not/exist.txt")).is_err());
    }
}
