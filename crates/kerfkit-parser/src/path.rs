//! Path extraction
//!
//! Turns instruction lines into an ordered vertex list. Only motion
//! endpoints become vertices, so every arc is represented by the chord
//! between its endpoints. Lines without a coordinate pair are skipped.

use kerfkit_core::Point;

use crate::instruction::Instruction;

/// Endpoint of a single line, if it is a motion with coordinates
pub fn extract_endpoint(line: &str) -> Option<Point> {
    Instruction::parse(line).endpoint()
}

/// Endpoints of every line that has one, in order
pub fn extract_vertices<S: AsRef<str>>(lines: &[S]) -> Vec<Point> {
    lines
        .iter()
        .filter_map(|line| extract_endpoint(line.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_vertices_uses_endpoints_only() {
        let lines = [
            "G01X+1928.2Y-892.4",
            "G02X+1914.6Y-884.5I+1914.6J-899.5",
            "F1200",
            "G03X+1866.9Y-958.8I+1849.2J-949.5",
        ];
        let vertices = extract_vertices(&lines);
        assert_eq!(
            vertices,
            vec![
                Point::new(1928.2, -892.4),
                Point::new(1914.6, -884.5),
                Point::new(1866.9, -958.8),
            ]
        );
    }

    #[test]
    fn test_extract_endpoint_skips_control_codes() {
        assert_eq!(extract_endpoint("M04"), None);
        assert_eq!(extract_endpoint("G41"), None);
    }
}
