//! Typed value extraction from prompt text
//!
//! Every function here expects text that is already lowercased. Tables are
//! ordered slices rather than maps: when two entries match at the same
//! place, the one declared first wins.

use crate::action::{ObjectKind, Vector3};
use crate::context::{SceneContext, SceneObject};
use regex::Regex;
use std::cmp::Reverse;
use std::sync::OnceLock;

/// Natural-language aliases for each object kind
pub const OBJECT_ALIASES: &[(&str, ObjectKind)] = &[
    ("robot", ObjectKind::RobotArm),
    ("robotic arm", ObjectKind::RobotArm),
    ("robot arm", ObjectKind::RobotArm),
    ("arm", ObjectKind::RobotArm),
    ("conveyor belt", ObjectKind::Conveyor),
    ("conveyor", ObjectKind::Conveyor),
    ("belt", ObjectKind::Conveyor),
    ("box", ObjectKind::Box),
    ("cube", ObjectKind::Box),
    ("crate", ObjectKind::Box),
    ("package", ObjectKind::Box),
    ("safety zone", ObjectKind::SafetyZone),
    ("safety area", ObjectKind::SafetyZone),
    ("hazard zone", ObjectKind::SafetyZone),
    ("warning zone", ObjectKind::SafetyZone),
    ("cylinder", ObjectKind::Cylinder),
    ("pipe", ObjectKind::Cylinder),
    ("sphere", ObjectKind::Sphere),
    ("ball", ObjectKind::Sphere),
];

/// Named colors and their hex codes
pub const COLORS: &[(&str, &str)] = &[
    ("red", "#ff4444"),
    ("green", "#44ff44"),
    ("blue", "#4444ff"),
    ("yellow", "#ffff44"),
    ("orange", "#ff8844"),
    ("purple", "#8844ff"),
    ("pink", "#ff44ff"),
    ("cyan", "#44ffff"),
    ("white", "#ffffff"),
    ("black", "#222222"),
    ("gray", "#888888"),
    ("grey", "#888888"),
    ("silver", "#c0c0c0"),
    ("gold", "#ffd700"),
    ("brown", "#8b4513"),
];

/// Positional phrases and the offset each one implies
pub const POSITION_KEYWORDS: &[(&str, Vector3)] = &[
    ("next to", Vector3::new(3.0, 0.0, 0.0)),
    ("beside", Vector3::new(3.0, 0.0, 0.0)),
    ("near", Vector3::new(2.0, 0.0, 2.0)),
    ("above", Vector3::new(0.0, 3.0, 0.0)),
    ("below", Vector3::new(0.0, -3.0, 0.0)),
    ("on the left", Vector3::new(-5.0, 0.0, 0.0)),
    ("on the right", Vector3::new(5.0, 0.0, 0.0)),
    ("on the front", Vector3::new(0.0, 0.0, 5.0)),
    ("on the back", Vector3::new(0.0, 0.0, -5.0)),
    ("on", Vector3::new(0.0, 1.0, 0.0)),
    ("left", Vector3::new(-5.0, 0.0, 0.0)),
    ("right", Vector3::new(5.0, 0.0, 0.0)),
    ("front", Vector3::new(0.0, 0.0, 5.0)),
    ("back", Vector3::new(0.0, 0.0, -5.0)),
    ("behind", Vector3::new(0.0, 0.0, -5.0)),
    ("center", Vector3::new(0.0, 0.0, 0.0)),
    ("middle", Vector3::new(0.0, 0.0, 0.0)),
];

/// Keywords that place the new object on the ground beside its referent
const GROUND_KEYWORDS: &[&str] = &[
    "near",
    "beside",
    "next to",
    "left",
    "right",
    "front",
    "back",
    "on the left",
    "on the right",
    "on the front",
    "on the back",
];

/// Offset from a referent when no positional keyword is given
const DEFAULT_REFERENT_OFFSET: f64 = 3.0;

static HEX_COLOR_RE: OnceLock<Regex> = OnceLock::new();
static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static COORDINATES_RE: OnceLock<Regex> = OnceLock::new();
static DEGREE_RES: OnceLock<Vec<Regex>> = OnceLock::new();
static POSITION_RES: OnceLock<Vec<(Regex, &'static str, Vector3)>> = OnceLock::new();

fn hex_color_re() -> &'static Regex {
    HEX_COLOR_RE.get_or_init(|| Regex::new(r"#[0-9a-fA-F]{6}").expect("hex color regex"))
}

fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("number regex"))
}

fn coordinates_re() -> &'static Regex {
    COORDINATES_RE.get_or_init(|| {
        Regex::new(r"\(?\s*(-?[0-9]+\.?[0-9]*)\s*,\s*(-?[0-9]+\.?[0-9]*)\s*,\s*(-?[0-9]+\.?[0-9]*)\s*\)?")
            .expect("coordinates regex")
    })
}

fn degree_res() -> &'static [Regex] {
    DEGREE_RES.get_or_init(|| {
        [
            r"([0-9]+)\s*degrees?",
            r"([0-9]+)\s*deg",
            r"([0-9]+)°",
            r"rotate.*?([0-9]+)",
            r"turn.*?([0-9]+)",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("degree regex"))
        .collect()
    })
}

fn position_res() -> &'static [(Regex, &'static str, Vector3)] {
    POSITION_RES.get_or_init(|| {
        POSITION_KEYWORDS
            .iter()
            .map(|(keyword, offset)| {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
                    .expect("position keyword regex");
                (re, *keyword, *offset)
            })
            .collect()
    })
}

/// Pick the earliest match, preferring the longest at equal start.
/// Full ties keep the first candidate.
fn earliest_longest<T>(candidates: impl IntoIterator<Item = (usize, usize, T)>) -> Option<T> {
    candidates
        .into_iter()
        .min_by_key(|(start, len, _)| (*start, Reverse(*len)))
        .map(|(_, _, value)| value)
}

/// Object kind named in the text, if any
pub fn extract_object_kind(text: &str) -> Option<ObjectKind> {
    earliest_longest(
        OBJECT_ALIASES
            .iter()
            .filter_map(|(alias, kind)| text.find(alias).map(|idx| (idx, alias.len(), *kind))),
    )
}

/// Hex code of the first named color found, else a literal `#rrggbb` token
pub fn extract_color(text: &str) -> Option<String> {
    if let Some((_, hex)) = COLORS.iter().find(|(name, _)| text.contains(name)) {
        return Some(hex.to_string());
    }
    hex_color_re().find(text).map(|m| m.as_str().to_string())
}

/// First signed decimal number in the text, or `default`
///
/// Values too large to represent count as absent.
pub fn extract_number(text: &str, default: f64) -> f64 {
    number_re()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n: &f64| n.is_finite())
        .unwrap_or(default)
}

/// Rotation angle in degrees, if one is given
pub fn extract_degrees(text: &str) -> Option<f64> {
    degree_res().iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .filter(|n: &f64| n.is_finite())
    })
}

/// Rotation axis; `y` unless the text says otherwise
pub fn extract_axis(text: &str) -> &'static str {
    const SEMANTIC: &[(&[&str], &str)] = &[
        (&["horizontal", "side to side", "yaw"], "y"),
        (&["vertical", "up and down", "pitch"], "x"),
        (&["roll", "twist"], "z"),
    ];

    for (words, axis) in SEMANTIC {
        if words.iter().any(|word| text.contains(word)) {
            return axis;
        }
    }

    for axis in ["x", "y", "z"] {
        let mentioned = text.contains(&format!(" {axis} "))
            || text.ends_with(&format!(" {axis}"))
            || text.contains(&format!("{axis}-axis"))
            || text.contains(&format!("{axis} axis"));
        if mentioned {
            return axis;
        }
    }

    "y"
}

/// Whether a context object's name or raw type occurs in the text
fn mentions(text: &str, obj: &SceneObject) -> bool {
    let kind = obj.kind.to_lowercase();
    obj.name_lower().is_some_and(|name| text.contains(&name))
        || (!kind.is_empty() && text.contains(&kind))
}

/// Target position for a new or moved object
///
/// Keyword offsets are overridden by an explicit `(x, y, z)` triple, and
/// both are overridden by a position relative to a context object the
/// text refers to.
pub fn extract_position(text: &str, context: Option<&SceneContext>) -> Vector3 {
    let keyword_matches: Vec<(usize, &'static str, Vector3)> = position_res()
        .iter()
        .filter_map(|(re, keyword, offset)| re.find(text).map(|m| (m.start(), *keyword, *offset)))
        .collect();

    let earliest = keyword_matches.iter().min_by_key(|(start, _, _)| *start);

    let mut position = earliest.map(|(_, _, offset)| *offset).unwrap_or_default();

    if let Some(explicit) = extract_coordinates(text) {
        position = explicit;
    }

    let referent = context.and_then(|ctx| ctx.objects.iter().find(|obj| mentions(text, obj)));
    if let Some(obj) = referent {
        let base = obj.position;
        position = match earliest {
            Some((_, keyword, offset)) => {
                let y = if GROUND_KEYWORDS.contains(keyword) {
                    0.0
                } else {
                    base.y + offset.y
                };
                Vector3::new(base.x + offset.x, y, base.z + offset.z)
            }
            None => Vector3::new(base.x + DEFAULT_REFERENT_OFFSET, 0.0, base.z),
        };
    }

    position
}

fn extract_coordinates(text: &str) -> Option<Vector3> {
    let caps = coordinates_re().captures(text)?;
    let component = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    };
    Some(Vector3::new(component(1)?, component(2)?, component(3)?))
}

/// Context object the text refers to, by name or type
pub fn find_target<'a>(text: &str, context: Option<&'a SceneContext>) -> Option<&'a SceneObject> {
    let ctx = context?;

    let mut candidates = Vec::new();
    for obj in &ctx.objects {
        if let Some(name) = obj.name_lower() {
            if let Some(idx) = text.find(&name) {
                candidates.push((idx, name.len(), obj));
            }
        }

        let kind = obj.kind.to_lowercase().replace('_', " ");
        if !kind.is_empty() {
            if let Some(idx) = text.find(&kind) {
                candidates.push((idx, kind.len(), obj));
            }
        }
    }

    if let Some(obj) = earliest_longest(candidates) {
        return Some(obj);
    }

    let kind = extract_object_kind(text)?;
    ctx.objects.iter().find(|obj| obj.kind == kind.as_str())
}
