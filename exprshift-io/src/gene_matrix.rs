//! Tab-separated gene matrix parser/writer.
//!
//! The layout is the conventional expression-table TSV: the first row
//! holds a leading label cell followed by one header per feature; each
//! following row holds a gene identifier followed by one floating-point
//! value per feature. Trailing tabs (some exporters emit one per row)
//! are tolerated on input and never emitted on output.

use std::fs;
use std::path::Path;

use exprshift_core::{ExprshiftError, GeneMatrix, Result};

/// Parse a tab-separated gene matrix from a string.
///
/// # Errors
///
/// Returns an error if the header row is missing, a data row has the
/// wrong number of cells, or a cell is not a valid float, each with
/// line-number context.
///
/// # Examples
///
/// ```
/// # use exprshift_io::gene_matrix::parse_gene_matrix_str;
/// let data = "gene\ts1\ts2\nYAL001C\t0.5\t1.25\nYAL002W\t-0.5\t2.0\n";
/// let m = parse_gene_matrix_str(data).unwrap();
/// assert_eq!(m.shape(), (2, 2));
/// assert_eq!(m.gene_names()[0], "YAL001C");
/// assert_eq!(m.get(1, 1), Some(2.0));
/// ```
pub fn parse_gene_matrix_str(data: &str) -> Result<GeneMatrix> {
    let mut lines = data
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx, line.trim_end()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| ExprshiftError::Parse("missing header row".into()))?;
    let mut header_cells = header.split('\t');
    header_cells.next(); // leading label cell
    let feature_names: Vec<String> = header_cells.map(|s| s.to_string()).collect();
    if feature_names.is_empty() {
        return Err(ExprshiftError::Parse(
            "header row has no feature columns".into(),
        ));
    }
    let n_features = feature_names.len();

    let mut gene_names = Vec::new();
    let mut rows = Vec::new();
    for (line_idx, line) in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != n_features + 1 {
            return Err(ExprshiftError::Parse(format!(
                "line {}: expected {} cells, found {}",
                line_idx + 1,
                n_features + 1,
                fields.len()
            )));
        }

        let gene = fields[0].to_string();
        let mut row = Vec::with_capacity(n_features);
        for cell in &fields[1..] {
            let value: f64 = cell.parse().map_err(|_| {
                ExprshiftError::Parse(format!(
                    "line {}: invalid value '{}' for gene '{}'",
                    line_idx + 1,
                    cell,
                    gene
                ))
            })?;
            row.push(value);
        }
        gene_names.push(gene);
        rows.push(row);
    }

    GeneMatrix::new(rows, gene_names, feature_names)
}

/// Read a tab-separated gene matrix from a file.
///
/// # Errors
///
/// I/O errors carry the path; parse errors are as in
/// [`parse_gene_matrix_str`].
pub fn read_gene_matrix(path: impl AsRef<Path>) -> Result<GeneMatrix> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|e| {
        ExprshiftError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    parse_gene_matrix_str(&data)
}

/// Write a gene matrix as a tab-separated string.
///
/// `label` fills the leading header cell (commonly `"gene"`).
///
/// # Examples
///
/// ```
/// # use exprshift_core::GeneMatrix;
/// # use exprshift_io::gene_matrix::write_gene_matrix_string;
/// let m = GeneMatrix::new(
///     vec![vec![0.5, 1.25]],
///     vec!["YAL001C".into()],
///     vec!["s1".into(), "s2".into()],
/// )
/// .unwrap();
/// let out = write_gene_matrix_string(&m, "gene");
/// assert_eq!(out, "gene\ts1\ts2\nYAL001C\t0.5\t1.25\n");
/// ```
pub fn write_gene_matrix_string(matrix: &GeneMatrix, label: &str) -> String {
    let mut out = String::new();

    out.push_str(label);
    for name in matrix.feature_names() {
        out.push('\t');
        out.push_str(name);
    }
    out.push('\n');

    for (gene_idx, gene) in matrix.gene_names().iter().enumerate() {
        out.push_str(gene);
        // row() is in range by construction
        if let Some(row) = matrix.row(gene_idx) {
            for value in row {
                out.push('\t');
                out.push_str(&value.to_string());
            }
        }
        out.push('\n');
    }

    out
}

/// Write a gene matrix to a file in tab-separated layout.
///
/// # Errors
///
/// I/O errors carry the path.
pub fn write_gene_matrix(path: impl AsRef<Path>, matrix: &GeneMatrix, label: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_gene_matrix_string(matrix, label)).map_err(|e| {
        ExprshiftError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}
