//! graph6 binary encoding and its base64 transport wrapper.
//!
//! The size prefix follows the standard three-tier graph6 scheme. The
//! upper-triangle bit order is configurable: the original system this
//! engine was modeled on emits the upper triangle row-major (`i` outer,
//! `j > i` inner), but third-party interop with `labelg`/nauty expects
//! column-major (`j` outer, `i < j` inner). [`Graph6Orientation::ColumnMajor`]
//! is the crate default; `RowMajor` is kept for compatibility with the
//! original system's stored strings. See DESIGN.md for the rationale.

use base64::Engine;
use specx_core::errors::{ErrorInfo, SpecxError};

use crate::edges::EdgeSet;

/// Upper-triangle bit ordering used when serializing the adjacency matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graph6Orientation {
    /// NAUTY-compatible: column `j` outer, row `i < j` inner. Required for
    /// byte-stable round trips through the real `labelg` binary.
    ColumnMajor,
    /// Row `i` outer, column `j > i` inner, matching the original system.
    RowMajor,
}

impl Default for Graph6Orientation {
    fn default() -> Self {
        Graph6Orientation::ColumnMajor
    }
}

fn encode_size(n: usize) -> Result<Vec<u8>, SpecxError> {
    if n > 68_719_476_735 {
        return Err(SpecxError::Validation(
            ErrorInfo::new("graph6_n_too_large", "graph6: n too large").with_context("n", n.to_string()),
        ));
    }

    if n <= 62 {
        return Ok(vec![(n + 63) as u8]);
    }

    if n <= 258_047 {
        let x = n as u32;
        return Ok(vec![
            b'~',
            (((x >> 12) & 0x3F) + 63) as u8,
            (((x >> 6) & 0x3F) + 63) as u8,
            ((x & 0x3F) + 63) as u8,
        ]);
    }

    let x = n as u64;
    let mut out = vec![b'~', b'~'];
    for shift in [30, 24, 18, 12, 6, 0] {
        out.push((((x >> shift) & 0x3F) + 63) as u8);
    }
    Ok(out)
}

fn upper_triangle_pairs(n: usize, orientation: Graph6Orientation) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n / 2);
    match orientation {
        Graph6Orientation::RowMajor => {
            for i in 0..n {
                for j in (i + 1)..n {
                    pairs.push((i, j));
                }
            }
        }
        Graph6Orientation::ColumnMajor => {
            for j in 0..n {
                for i in 0..j {
                    pairs.push((i, j));
                }
            }
        }
    }
    pairs
}

/// Encodes an edge set as a graph6 string, using the given bit orientation.
pub fn encode(edge_set: &EdgeSet, orientation: Graph6Orientation) -> Result<String, SpecxError> {
    let n = edge_set.n();
    let mut adjacent = std::collections::BTreeSet::new();
    for &(u, v) in edge_set.edges() {
        adjacent.insert((u as usize, v as usize));
    }

    let mut bits: Vec<u8> = Vec::new();
    for (i, j) in upper_triangle_pairs(n, orientation) {
        let key = if i < j { (i, j) } else { (j, i) };
        bits.push(if adjacent.contains(&key) { 1 } else { 0 });
    }
    while bits.len() % 6 != 0 {
        bits.push(0);
    }

    let mut out = encode_size(n)?;
    for chunk in bits.chunks(6) {
        let mut val: u32 = 0;
        for &b in chunk {
            val = (val << 1) | b as u32;
        }
        out.push((63 + val) as u8);
    }

    String::from_utf8(out)
        .map_err(|_| SpecxError::internal("graph6_non_ascii", "graph6 encoder produced non-ASCII output"))
}

/// Decodes a graph6 string back into an [`EdgeSet`], using the given bit
/// orientation (must match the orientation used to encode).
pub fn decode(g6: &str, orientation: Graph6Orientation) -> Result<EdgeSet, SpecxError> {
    let bytes = g6.trim_end().as_bytes();
    if bytes.is_empty() {
        return Err(SpecxError::validation("graph6_empty", "graph6 string is empty"));
    }

    let (n, rest) = if bytes[0] == b'~' {
        if bytes.len() >= 2 && bytes[1] == b'~' {
            if bytes.len() < 8 {
                return Err(SpecxError::validation(
                    "graph6_truncated_header",
                    "graph6 six-byte size header truncated",
                ));
            }
            let mut n: u64 = 0;
            for &b in &bytes[2..8] {
                n = (n << 6) | (b - 63) as u64;
            }
            (n as usize, &bytes[8..])
        } else {
            if bytes.len() < 4 {
                return Err(SpecxError::validation(
                    "graph6_truncated_header",
                    "graph6 three-byte size header truncated",
                ));
            }
            let mut n: u32 = 0;
            for &b in &bytes[1..4] {
                n = (n << 6) | (b - 63) as u32;
            }
            (n as usize, &bytes[4..])
        }
    } else {
        (bytes[0] as usize - 63, &bytes[1..])
    };

    let pairs = upper_triangle_pairs(n, orientation);
    let mut bits: Vec<u8> = Vec::with_capacity(pairs.len());
    for &byte in rest {
        if !(63..=126).contains(&byte) {
            return Err(SpecxError::validation(
                "graph6_invalid_byte",
                "graph6 payload byte outside the printable range",
            ));
        }
        let val = byte - 63;
        for shift in (0..6).rev() {
            bits.push((val >> shift) & 1);
        }
    }
    if bits.len() < pairs.len() {
        return Err(SpecxError::validation(
            "graph6_truncated_payload",
            "graph6 payload shorter than the expected upper-triangle bit count",
        ));
    }

    let mut raw_edges = Vec::new();
    for (&(i, j), &bit) in pairs.iter().zip(bits.iter()) {
        if bit == 1 {
            raw_edges.push((i as u32, j as u32));
        }
    }

    Ok(EdgeSet::normalize(n, raw_edges))
}

/// Wraps a graph6 string in standard base64, for transport in JSON/API
/// payloads.
pub fn to_base64(g6: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(g6.as_bytes())
}

/// Decodes a standard-base64-wrapped graph6 string.
pub fn from_base64(b64: &str) -> Result<String, SpecxError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|err| SpecxError::validation("graph6_b64_decode_failed", err.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|err| SpecxError::validation("graph6_b64_not_utf8", err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_prefix_n62_is_one_byte() {
        let prefix = encode_size(62).unwrap();
        assert_eq!(prefix, vec![0x7D]);
    }

    #[test]
    fn size_prefix_n63_uses_tilde() {
        let prefix = encode_size(63).unwrap();
        assert_eq!(prefix.len(), 4);
        assert_eq!(prefix[0], b'~');
    }

    #[test]
    fn round_trips_k4_column_major() {
        let es = EdgeSet::normalize(4, [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let g6 = encode(&es, Graph6Orientation::ColumnMajor).unwrap();
        let back = decode(&g6, Graph6Orientation::ColumnMajor).unwrap();
        assert_eq!(back, es);
    }

    #[test]
    fn round_trips_path5_row_major() {
        let es = EdgeSet::normalize(5, [(0, 1), (1, 2), (2, 3), (3, 4)]);
        let g6 = encode(&es, Graph6Orientation::RowMajor).unwrap();
        let back = decode(&g6, Graph6Orientation::RowMajor).unwrap();
        assert_eq!(back, es);
    }

    #[test]
    fn base64_round_trips() {
        let g6 = "DQc";
        let b64 = to_base64(g6);
        assert_eq!(from_base64(&b64).unwrap(), g6);
    }

    #[test]
    fn empty_graph_round_trips() {
        let es = EdgeSet::normalize(0, []);
        let g6 = encode(&es, Graph6Orientation::ColumnMajor).unwrap();
        let back = decode(&g6, Graph6Orientation::ColumnMajor).unwrap();
        assert_eq!(back, es);
    }
}
