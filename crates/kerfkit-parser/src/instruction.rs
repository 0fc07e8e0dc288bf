//! Instruction line grammar
//!
//! Classifies a single program line as a motion code (`G00`..`G03` with an
//! optional `X..Y..` endpoint and `I..J..` center offset), a control code
//! (`G40`/`G41`/`G42`, `M03`/`M04`) or an unrecognized line.
//!
//! Comments (`;` or `(` to end of line) are dropped first. A motion word may
//! sit anywhere in the line, so block numbers (`N10`) and trailing words
//! such as feed rates (`F1000`) do not hide it. Coordinate pairs are
//! searched for independently of the motion word.

use kerfkit_core::Point;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)";

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"[;(].*").expect("invalid regex pattern"))
}

fn motion_regex() -> &'static Regex {
    static MOTION_REGEX: OnceLock<Regex> = OnceLock::new();
    // The trailing group keeps `G1` from matching inside `G10`
    MOTION_REGEX.get_or_init(|| {
        Regex::new(r"(?i)G0?([0-3])(?:[^0-9.]|$)").expect("invalid regex pattern")
    })
}

fn endpoint_regex() -> &'static Regex {
    static ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();
    ENDPOINT_REGEX.get_or_init(|| {
        Regex::new(&format!(r"(?i)X({n})Y({n})", n = NUMBER)).expect("invalid regex pattern")
    })
}

fn center_regex() -> &'static Regex {
    static CENTER_REGEX: OnceLock<Regex> = OnceLock::new();
    CENTER_REGEX.get_or_init(|| {
        Regex::new(&format!(r"(?i)I({n})J({n})", n = NUMBER)).expect("invalid regex pattern")
    })
}

fn control_regex() -> &'static Regex {
    static CONTROL_REGEX: OnceLock<Regex> = OnceLock::new();
    CONTROL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^(?:N\d+)?(?:G(4[0-2])|M0?([34]))$").expect("invalid regex pattern")
    })
}

fn coordinate_pair(regex: &Regex, text: &str) -> Option<Point> {
    let caps = regex.captures(text)?;
    let x = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let y = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(Point::new(x, y))
}

/// Motion codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionCode {
    /// G00 rapid positioning
    Rapid,
    /// G01 linear cut
    Linear,
    /// G02 clockwise arc
    ArcClockwise,
    /// G03 counter-clockwise arc
    ArcCounterClockwise,
}

impl MotionCode {
    fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            2 => Some(Self::ArcClockwise),
            3 => Some(Self::ArcCounterClockwise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rapid => "G00",
            Self::Linear => "G01",
            Self::ArcClockwise => "G02",
            Self::ArcCounterClockwise => "G03",
        }
    }
}

/// Control codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlCode {
    /// G41 cutter compensation left
    CompensationLeft,
    /// G42 cutter compensation right
    CompensationRight,
    /// G40 cutter compensation cancel
    CompensationCancel,
    /// M04, used as the block start marker
    SpindleDown,
    /// M03, used as the block end marker
    SpindleUp,
}

impl ControlCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompensationLeft => "G41",
            Self::CompensationRight => "G42",
            Self::CompensationCancel => "G40",
            Self::SpindleDown => "M04",
            Self::SpindleUp => "M03",
        }
    }

    /// Whether this code selects a compensation side
    pub fn is_compensation_side(&self) -> bool {
        matches!(self, Self::CompensationLeft | Self::CompensationRight)
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified program line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Motion {
        code: MotionCode,
        endpoint: Option<Point>,
        /// Arc center relative to the arc start. Never used for geometry.
        center_offset: Option<Point>,
    },
    Control(ControlCode),
    Unrecognized,
}

impl Instruction {
    /// Classify a single line. Whitespace between words is ignored and
    /// matching is case-insensitive.
    pub fn parse(line: &str) -> Self {
        let uncommented = comment_regex().replace(line, "");
        let compact: String = uncommented.split_whitespace().collect();

        if let Some(caps) = control_regex().captures(&compact) {
            let code = match (caps.get(1).map(|m| m.as_str()), caps.get(2).map(|m| m.as_str())) {
                (Some("40"), _) => ControlCode::CompensationCancel,
                (Some("41"), _) => ControlCode::CompensationLeft,
                (Some("42"), _) => ControlCode::CompensationRight,
                (_, Some("3")) => ControlCode::SpindleUp,
                (_, Some("4")) => ControlCode::SpindleDown,
                _ => return Self::Unrecognized,
            };
            return Self::Control(code);
        }

        let Some(code) = motion_regex()
            .captures(&compact)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .and_then(MotionCode::from_number)
        else {
            return Self::Unrecognized;
        };

        Self::Motion {
            code,
            endpoint: coordinate_pair(endpoint_regex(), &compact),
            center_offset: coordinate_pair(center_regex(), &compact),
        }
    }

    /// Endpoint of a motion instruction, if it carries one
    pub fn endpoint(&self) -> Option<Point> {
        match self {
            Self::Motion { endpoint, .. } => *endpoint,
            _ => None,
        }
    }

    pub fn is_control(&self, code: ControlCode) -> bool {
        matches!(self, Self::Control(c) if *c == code)
    }

    pub fn is_linear_cut(&self) -> bool {
        matches!(
            self,
            Self::Motion {
                code: MotionCode::Linear,
                ..
            }
        )
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Format a rapid positioning line with explicit signs, e.g. `G00X+12.5Y-3.0`
pub fn format_rapid(point: Point, precision: usize) -> String {
    // Adding 0.0 folds negative zero into positive zero
    format!(
        "G00X{:+.prec$}Y{:+.prec$}",
        point.x + 0.0,
        point.y + 0.0,
        prec = precision
    )
}
