//! Mesh geometry to source literal conversion.
//!
//! Reads a triangle mesh in the JSON shape produced by common mesh
//! exporters (`{"cells": [[a, b, c], ...], "positions": [[x, y, z], ...]}`)
//! and renders it as two Toucan array declarations, one for triangle
//! indices and one for vertex positions.

use serde::Deserialize;
use std::fmt::Write as _;
use thiserror::Error;

/// Default mesh input file name.
pub const DEFAULT_INPUT: &str = "stanford-dragon.json";

/// Default prefix for the generated variable names.
pub const DEFAULT_NAME: &str = "dragon";

/// Mesh conversion errors.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input is not valid mesh JSON.
    #[error("invalid mesh JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The variable name prefix cannot be used as an identifier.
    #[error("invalid variable name '{0}': expected an identifier")]
    InvalidName(String),
}

/// A triangle mesh: index triples into a list of 3D positions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshGeometry {
    /// Triangles as vertex index triples.
    pub cells: Vec<[u32; 3]>,
    /// Vertex positions.
    pub positions: Vec<[f64; 3]>,
}

impl MeshGeometry {
    /// Parses mesh JSON. Keys other than `cells` and `positions` are ignored.
    pub fn from_json(input: &str) -> Result<Self, MeshError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Renders the triangle and vertex arrays as Toucan declarations.
    ///
    /// ```
    /// use toucan_build_tools::mesh::MeshGeometry;
    ///
    /// let mesh = MeshGeometry::from_json(
    ///     r#"{"cells": [[0, 1, 2]], "positions": [[0.0, 1.0, 0.5]]}"#,
    /// ).unwrap();
    /// let source = mesh.render_literals("tri").unwrap();
    /// assert!(source.starts_with("var triTriangles : [1][3]uint = {\n  {0, 1, 2}\n};\n"));
    /// assert!(source.ends_with("  {0.0, 1.0, 0.5}\n};\n"));
    /// ```
    pub fn render_literals(&self, name: &str) -> Result<String, MeshError> {
        validate_name(name)?;

        let mut out = String::new();
        render_array(
            &mut out,
            &format!("{name}Triangles"),
            "[3]uint",
            &self.cells,
            |[a, b, c]| format!("{a}, {b}, {c}"),
        );
        render_array(
            &mut out,
            &format!("{name}Vertices"),
            "float<3>",
            &self.positions,
            |position| position.map(float_literal).join(", "),
        );
        Ok(out)
    }
}

fn render_array<T>(
    out: &mut String,
    var: &str,
    element_type: &str,
    items: &[T],
    element: impl Fn(&T) -> String,
) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "var {var} : [{}]{element_type} = {{", items.len());
    for (i, item) in items.iter().enumerate() {
        let comma = if i + 1 < items.len() { "," } else { "" };
        let _ = writeln!(out, "  {{{}}}{comma}", element(item));
    }
    out.push_str("};\n");
}

/// Plain decimal notation with a fractional part: `1.0`, `0.0000001`, never
/// an exponent.
fn float_literal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') { text } else { text + ".0" }
}

fn validate_name(name: &str) -> Result<(), MeshError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MeshError::InvalidName(name.to_string()))
    }
}
