//! Individual command recognizers
//!
//! Each recognizer looks for its trigger words and, if its preconditions
//! hold, emits actions. A recognizer that cannot resolve what it needs
//! returns nothing.

use super::Utterance;
use crate::action::{Action, ActionKind, ObjectKind, Vector3};
use crate::extract::{
    extract_axis, extract_color, extract_degrees, extract_number, extract_object_kind,
    extract_position, find_target,
};
use regex::Regex;
use std::sync::OnceLock;

/// Trigger words matched as whole words, compiled on first use
struct WordSet {
    words: &'static [&'static str],
    re: OnceLock<Regex>,
}

impl WordSet {
    const fn new(words: &'static [&'static str]) -> Self {
        Self {
            words,
            re: OnceLock::new(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.re
            .get_or_init(|| {
                let alternatives: Vec<String> =
                    self.words.iter().map(|word| regex::escape(word)).collect();
                Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
                    .expect("trigger word regex")
            })
            .is_match(text)
    }
}

static ADD_WORDS: WordSet =
    WordSet::new(&["add", "create", "place", "put", "insert", "spawn", "generate"]);
static REMOVE_WORDS: WordSet = WordSet::new(&["remove", "delete", "destroy", "clear", "erase"]);
static ROTATE_WORDS: WordSet = WordSet::new(&["rotate", "turn", "spin", "twist", "orient"]);
static MOVE_WORDS: WordSet =
    WordSet::new(&["move", "shift", "translate", "position", "relocate"]);
static SCALE_WORDS: WordSet =
    WordSet::new(&["scale", "resize", "grow", "shrink", "enlarge", "expand", "reduce"]);
static HIGHLIGHT_WORDS: WordSet =
    WordSet::new(&["highlight", "glow", "mark", "emphasize", "select"]);
static CAMERA_WORDS: WordSet = WordSet::new(&["zoom", "camera", "view", "look", "focus", "pan"]);
static HIDE_WORDS: WordSet = WordSet::new(&["hide", "invisible"]);
static SHOW_WORDS: WordSet = WordSet::new(&["show", "visible", "reveal"]);
static ANIMATE_WORDS: WordSet = WordSet::new(&["animate", "start", "run", "activate"]);
static STOP_WORDS: WordSet = WordSet::new(&["stop", "pause", "deactivate"]);

// Matched as substrings rather than whole words.
const RECOLOR_WORDS: &[&str] = &["color", "paint", "make", "set", "change"];
const SCENE_WIDE_WORDS: &[&str] = &["all", "everything", "scene"];
const SHRINK_WORDS: &[&str] = &["shrink", "reduce", "smaller"];
const GROW_WORDS: &[&str] = &["grow", "enlarge"];
const SAFETY_WORDS: &[&str] = &["safety", "zone", "area"];

const DEFAULT_OBJECT_COLOR: &str = "#888888";
const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";
const HIGHLIGHT_DURATION_MS: f64 = 3000.0;
const SAFETY_ZONE_SIZE: Vector3 = Vector3::new(5.0, 0.1, 5.0);
const DEFAULT_ROTATION_DEGREES: f64 = 30.0;
const DEFAULT_MOVE_AMOUNT: f64 = 2.0;
const DEFAULT_SCALE_FACTOR: f64 = 1.5;
const MIN_SCALE_FACTOR: f64 = 0.1;
const MAX_SCALE_FACTOR: f64 = 10.0;
const CLAMPED_GROW_FACTOR: f64 = 1.5;
const CLAMPED_SHRINK_FACTOR: f64 = 0.5;
const ZOOM_AMOUNT: f64 = 0.5;
const FOCUS_OFFSET: Vector3 = Vector3::new(8.0, 6.0, 8.0);

const CAMERA_TARGET: &str = "camera";
const SCENE_TARGET: &str = "scene";

/// Named camera placements: (name, camera position, look-at target)
const CAMERA_PRESETS: &[(&str, Vector3, Vector3)] = &[
    (
        "inspection area",
        Vector3::new(5.0, 5.0, 5.0),
        Vector3::new(0.0, 1.0, 0.0),
    ),
    (
        "conveyor",
        Vector3::new(0.0, 8.0, 10.0),
        Vector3::new(0.0, 0.0, 0.0),
    ),
    (
        "robot",
        Vector3::new(8.0, 6.0, 8.0),
        Vector3::new(-3.0, 2.0, 0.0),
    ),
    (
        "overview",
        Vector3::new(15.0, 15.0, 15.0),
        Vector3::new(0.0, 0.0, 0.0),
    ),
    (
        "top",
        Vector3::new(0.0, 20.0, 0.1),
        Vector3::new(0.0, 0.0, 0.0),
    ),
    (
        "side",
        Vector3::new(20.0, 5.0, 0.0),
        Vector3::new(0.0, 2.0, 0.0),
    ),
];

static RESET_RE: OnceLock<Regex> = OnceLock::new();

fn reset_re() -> &'static Regex {
    RESET_RE.get_or_init(|| {
        Regex::new(r"\b(reset|clear|restart)\b(?:\s+the)?\s*\b(scene|all|everything)\b")
            .expect("reset regex")
    })
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn target_id(u: &Utterance) -> Option<String> {
    find_target(u.text, u.context).map(|obj| obj.id.clone())
}

/// `add_object` for a freshly allocated object of `kind`
fn spawn_object(u: &Utterance, kind: ObjectKind) -> Action {
    let position = extract_position(u.text, u.context);
    let color = extract_color(u.text).unwrap_or_else(|| DEFAULT_OBJECT_COLOR.to_string());
    let id = u.ids.allocate(kind.as_str(), u.context);

    Action::new(ActionKind::AddObject)
        .with_target(id)
        .with_param("type", kind.as_str())
        .with_param("name", kind.display_name())
        .with_param("position", position)
        .with_param("rotation", Vector3::ZERO)
        .with_param("scale", Vector3::ONE)
        .with_param("color", color)
}

pub(super) fn add(u: &Utterance) -> Vec<Action> {
    if !ADD_WORDS.matches(u.text) {
        return Vec::new();
    }
    match extract_object_kind(u.text) {
        Some(kind) => vec![spawn_object(u, kind)],
        None => Vec::new(),
    }
}

pub(super) fn remove(u: &Utterance) -> Vec<Action> {
    if !REMOVE_WORDS.matches(u.text) {
        return Vec::new();
    }
    if let Some(target) = target_id(u) {
        return vec![Action::new(ActionKind::RemoveObject).with_target(target)];
    }
    if contains_any(u.text, SCENE_WIDE_WORDS) {
        return vec![Action::new(ActionKind::ResetScene)
            .with_target(SCENE_TARGET)
            .with_param("keep_defaults", false)];
    }
    Vec::new()
}

pub(super) fn rotate(u: &Utterance) -> Vec<Action> {
    if !ROTATE_WORDS.matches(u.text) {
        return Vec::new();
    }
    let Some(target) = target_id(u) else {
        return Vec::new();
    };

    // An explicit zero reads as "no angle given".
    let degrees = extract_degrees(u.text)
        .filter(|degrees| *degrees != 0.0)
        .unwrap_or(DEFAULT_ROTATION_DEGREES);

    vec![Action::new(ActionKind::RotateObject)
        .with_target(target)
        .with_param("axis", extract_axis(u.text))
        .with_param("degrees", degrees)]
}

pub(super) fn translate(u: &Utterance) -> Vec<Action> {
    if !MOVE_WORDS.matches(u.text) {
        return Vec::new();
    }
    let Some(target) = target_id(u) else {
        return Vec::new();
    };

    let position = extract_position(u.text, u.context);
    if !position.is_origin() {
        return vec![Action::new(ActionKind::MoveObject)
            .with_target(target)
            .with_param("position", position)
            .with_param("absolute", true)];
    }

    let amount = extract_number(u.text, DEFAULT_MOVE_AMOUNT);
    let text = u.text;
    let mut delta = Vector3::ZERO;

    if text.contains("left") {
        delta.x = -amount;
    } else if text.contains("right") {
        delta.x = amount;
    }
    if text.contains("up") {
        delta.y = amount;
    } else if text.contains("down") {
        delta.y = -amount;
    }
    if text.contains("forward") || text.contains("front") {
        delta.z = amount;
    } else if text.contains("back") {
        delta.z = -amount;
    }

    vec![Action::new(ActionKind::MoveObject)
        .with_target(target)
        .with_param("delta", delta)
        .with_param("absolute", false)]
}

pub(super) fn scale(u: &Utterance) -> Vec<Action> {
    if !SCALE_WORDS.matches(u.text) {
        return Vec::new();
    }
    let Some(target) = target_id(u) else {
        return Vec::new();
    };

    let mut factor = extract_number(u.text, DEFAULT_SCALE_FACTOR);
    if contains_any(u.text, SHRINK_WORDS) {
        factor = 1.0 / factor.max(1.0);
    } else if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&factor) {
        factor = if contains_any(u.text, GROW_WORDS) {
            CLAMPED_GROW_FACTOR
        } else {
            CLAMPED_SHRINK_FACTOR
        };
    }

    vec![Action::new(ActionKind::ScaleObject)
        .with_target(target)
        .with_param("factor", factor)]
}

pub(super) fn recolor(u: &Utterance) -> Vec<Action> {
    let Some(color) = extract_color(u.text) else {
        return Vec::new();
    };
    if !contains_any(u.text, RECOLOR_WORDS) {
        return Vec::new();
    }
    match target_id(u) {
        Some(target) => vec![Action::new(ActionKind::SetColor)
            .with_target(target)
            .with_param("color", color)],
        None => Vec::new(),
    }
}

pub(super) fn highlight(u: &Utterance) -> Vec<Action> {
    if !HIGHLIGHT_WORDS.matches(u.text) {
        return Vec::new();
    }
    let color = extract_color(u.text).unwrap_or_else(|| DEFAULT_HIGHLIGHT_COLOR.to_string());

    if contains_any(u.text, SAFETY_WORDS) {
        let position = extract_position(u.text, u.context);
        let id = u.ids.allocate(ObjectKind::SafetyZone.as_str(), u.context);
        return vec![Action::new(ActionKind::AddSafetyZone)
            .with_target(id)
            .with_param("position", position)
            .with_param("color", color)
            .with_param("size", SAFETY_ZONE_SIZE)];
    }

    match target_id(u) {
        Some(target) => vec![Action::new(ActionKind::HighlightObject)
            .with_target(target)
            .with_param("color", color)
            .with_param("duration", HIGHLIGHT_DURATION_MS)],
        None => Vec::new(),
    }
}

fn camera_focus(position: Vector3, look_at: Vector3) -> Action {
    Action::new(ActionKind::CameraFocus)
        .with_target(CAMERA_TARGET)
        .with_param("position", position)
        .with_param("target", look_at)
}

fn camera_zoom(direction: &str) -> Action {
    Action::new(ActionKind::CameraZoom)
        .with_target(CAMERA_TARGET)
        .with_param("direction", direction)
        .with_param("amount", ZOOM_AMOUNT)
}

pub(super) fn camera(u: &Utterance) -> Vec<Action> {
    if !CAMERA_WORDS.matches(u.text) {
        return Vec::new();
    }

    if let Some((_, position, look_at)) = CAMERA_PRESETS
        .iter()
        .find(|(name, _, _)| u.text.contains(name))
    {
        return vec![camera_focus(*position, *look_at)];
    }

    if u.text.contains("zoom") {
        if u.text.contains("in") {
            return vec![camera_zoom("in")];
        }
        if u.text.contains("out") {
            return vec![camera_zoom("out")];
        }
    }

    match find_target(u.text, u.context) {
        Some(obj) => vec![camera_focus(obj.position + FOCUS_OFFSET, obj.position)],
        None => Vec::new(),
    }
}

fn set_visibility(target: String, visible: bool) -> Vec<Action> {
    vec![Action::new(ActionKind::SetVisibility)
        .with_target(target)
        .with_param("visible", visible)]
}

pub(super) fn visibility(u: &Utterance) -> Vec<Action> {
    if HIDE_WORDS.matches(u.text) {
        if let Some(target) = target_id(u) {
            return set_visibility(target, false);
        }
    }
    if SHOW_WORDS.matches(u.text) {
        if let Some(target) = target_id(u) {
            return set_visibility(target, true);
        }
    }
    Vec::new()
}

pub(super) fn reset(u: &Utterance) -> Vec<Action> {
    if !reset_re().is_match(u.text) {
        return Vec::new();
    }
    vec![Action::new(ActionKind::ResetScene)
        .with_target(SCENE_TARGET)
        .with_param("keep_defaults", true)]
}

fn set_animation(target: String, animate: bool) -> Vec<Action> {
    vec![Action::new(ActionKind::AnimateObject)
        .with_target(target)
        .with_param("animate", animate)]
}

pub(super) fn animate(u: &Utterance) -> Vec<Action> {
    if ANIMATE_WORDS.matches(u.text) {
        if let Some(target) = target_id(u) {
            return set_animation(target, true);
        }
    }
    if STOP_WORDS.matches(u.text) {
        if let Some(target) = target_id(u) {
            return set_animation(target, false);
        }
    }
    Vec::new()
}

/// Last resort: a bare object mention means "add one of these"
pub(super) fn infer_intent(u: &Utterance) -> Vec<Action> {
    match extract_object_kind(u.text) {
        Some(kind) => vec![spawn_object(u, kind)],
        None => Vec::new(),
    }
}
