//! Scene action model
//!
//! An [`Action`] is one structured scene-mutation command. Both the
//! rule-based parser and the AI-assisted parser produce actions, and the
//! editor applies them in order.
//!
//! Wire format: `{"action": "rotate_object", "target": "robot_arm_1", "params": {...}}`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors from validating an action against its kind's parameter schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{kind} does not accept parameter '{key}'")]
    UnknownParam { kind: ActionKind, key: String },

    #[error("{kind} parameter '{key}' must be {expected}")]
    InvalidParam {
        kind: ActionKind,
        key: String,
        expected: &'static str,
    },

    #[error("{kind} requires parameter '{key}'")]
    MissingParam { kind: ActionKind, key: &'static str },

    #[error("{0} requires a target")]
    MissingTarget(ActionKind),
}

/// Closed set of action kinds the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    AddObject,
    RemoveObject,
    MoveObject,
    RotateObject,
    ScaleObject,
    SetColor,
    SetVisibility,
    SetProperty,
    CameraMove,
    CameraZoom,
    CameraFocus,
    AddSafetyZone,
    SetLighting,
    HighlightObject,
    AnimateObject,
    ResetScene,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::AddObject => "add_object",
            ActionKind::RemoveObject => "remove_object",
            ActionKind::MoveObject => "move_object",
            ActionKind::RotateObject => "rotate_object",
            ActionKind::ScaleObject => "scale_object",
            ActionKind::SetColor => "set_color",
            ActionKind::SetVisibility => "set_visibility",
            ActionKind::SetProperty => "set_property",
            ActionKind::CameraMove => "camera_move",
            ActionKind::CameraZoom => "camera_zoom",
            ActionKind::CameraFocus => "camera_focus",
            ActionKind::AddSafetyZone => "add_safety_zone",
            ActionKind::SetLighting => "set_lighting",
            ActionKind::HighlightObject => "highlight_object",
            ActionKind::AnimateObject => "animate_object",
            ActionKind::ResetScene => "reset_scene",
        }
    }

    /// Parameter schema for this kind
    pub fn schema(&self) -> KindSchema {
        let (params, target_required) = match self {
            ActionKind::AddObject => (ADD_OBJECT_PARAMS, true),
            ActionKind::RemoveObject => (NO_PARAMS, true),
            ActionKind::MoveObject => (MOVE_OBJECT_PARAMS, true),
            ActionKind::RotateObject => (ROTATE_OBJECT_PARAMS, true),
            ActionKind::ScaleObject => (SCALE_OBJECT_PARAMS, true),
            ActionKind::SetColor => (SET_COLOR_PARAMS, true),
            ActionKind::SetVisibility => (SET_VISIBILITY_PARAMS, true),
            ActionKind::SetProperty => (SET_PROPERTY_PARAMS, true),
            ActionKind::CameraMove | ActionKind::CameraFocus => (CAMERA_PLACEMENT_PARAMS, false),
            ActionKind::CameraZoom => (CAMERA_ZOOM_PARAMS, false),
            ActionKind::AddSafetyZone => (SAFETY_ZONE_PARAMS, false),
            ActionKind::SetLighting => (SET_LIGHTING_PARAMS, false),
            ActionKind::HighlightObject => (HIGHLIGHT_PARAMS, true),
            ActionKind::AnimateObject => (ANIMATE_PARAMS, true),
            ActionKind::ResetScene => (RESET_SCENE_PARAMS, false),
        };

        KindSchema {
            params,
            target_required,
        }
    }
}

const fn req(key: &'static str, shape: ParamShape) -> ParamSpec {
    ParamSpec {
        key,
        shape,
        required: true,
    }
}

const fn opt(key: &'static str, shape: ParamShape) -> ParamSpec {
    ParamSpec {
        key,
        shape,
        required: false,
    }
}

const NO_PARAMS: &[ParamSpec] = &[];
const ADD_OBJECT_PARAMS: &[ParamSpec] = &[
    req("type", ParamShape::ObjectType),
    opt("name", ParamShape::Text),
    opt("position", ParamShape::Vector),
    opt("rotation", ParamShape::Vector),
    opt("scale", ParamShape::Vector),
    opt("color", ParamShape::Text),
];
const MOVE_OBJECT_PARAMS: &[ParamSpec] = &[
    opt("position", ParamShape::Vector),
    opt("delta", ParamShape::Vector),
    opt("absolute", ParamShape::Bool),
];
const ROTATE_OBJECT_PARAMS: &[ParamSpec] = &[
    req("axis", ParamShape::Axis),
    req("degrees", ParamShape::Number),
];
const SCALE_OBJECT_PARAMS: &[ParamSpec] = &[req("factor", ParamShape::Number)];
const SET_COLOR_PARAMS: &[ParamSpec] = &[req("color", ParamShape::Text)];
const SET_VISIBILITY_PARAMS: &[ParamSpec] = &[req("visible", ParamShape::Bool)];
const SET_PROPERTY_PARAMS: &[ParamSpec] = &[
    req("property", ParamShape::Text),
    req("value", ParamShape::Any),
];
const CAMERA_PLACEMENT_PARAMS: &[ParamSpec] = &[
    opt("position", ParamShape::Vector),
    opt("target", ParamShape::Vector),
];
const CAMERA_ZOOM_PARAMS: &[ParamSpec] = &[
    req("direction", ParamShape::ZoomDirection),
    opt("amount", ParamShape::Number),
];
const SAFETY_ZONE_PARAMS: &[ParamSpec] = &[
    opt("position", ParamShape::Vector),
    opt("color", ParamShape::Text),
    opt("size", ParamShape::Vector),
];
const SET_LIGHTING_PARAMS: &[ParamSpec] = &[
    opt("intensity", ParamShape::Number),
    opt("color", ParamShape::Text),
];
const HIGHLIGHT_PARAMS: &[ParamSpec] = &[
    opt("color", ParamShape::Text),
    opt("duration", ParamShape::Number),
];
const ANIMATE_PARAMS: &[ParamSpec] = &[req("animate", ParamShape::Bool)];
const RESET_SCENE_PARAMS: &[ParamSpec] = &[opt("keep_defaults", ParamShape::Bool)];

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of object the editor can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Conveyor,
    RobotArm,
    Box,
    SafetyZone,
    Cylinder,
    Sphere,
    Custom,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 7] = [
        ObjectKind::Conveyor,
        ObjectKind::RobotArm,
        ObjectKind::Box,
        ObjectKind::SafetyZone,
        ObjectKind::Cylinder,
        ObjectKind::Sphere,
        ObjectKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Conveyor => "conveyor",
            ObjectKind::RobotArm => "robot_arm",
            ObjectKind::Box => "box",
            ObjectKind::SafetyZone => "safety_zone",
            ObjectKind::Cylinder => "cylinder",
            ObjectKind::Sphere => "sphere",
            ObjectKind::Custom => "custom",
        }
    }

    /// Look up a kind by its wire name (`"robot_arm"`)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Title-cased display name (`robot_arm` -> `Robot Arm`)
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point or direction in scene space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_origin(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A single parameter value
///
/// Untagged so that AI replies deserialize without knowing the kind first.
/// Anything that is not a bool, number, string or `{x, y, z}` lands in
/// `Json` and is rejected by schema validation unless the key accepts any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Vector(Vector3),
    Json(serde_json::Value),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            ParamValue::Vector(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vector3> for ParamValue {
    fn from(value: Vector3) -> Self {
        ParamValue::Vector(value)
    }
}

/// Shape a parameter value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    Text,
    Number,
    Bool,
    Vector,
    /// One of `x`, `y`, `z`
    Axis,
    /// One of `in`, `out`
    ZoomDirection,
    /// A known [`ObjectKind`] wire name
    ObjectType,
    Any,
}

impl ParamShape {
    fn describe(&self) -> &'static str {
        match self {
            ParamShape::Text => "a string",
            ParamShape::Number => "a number",
            ParamShape::Bool => "a boolean",
            ParamShape::Vector => "an {x, y, z} vector",
            ParamShape::Axis => "one of \"x\", \"y\", \"z\"",
            ParamShape::ZoomDirection => "one of \"in\", \"out\"",
            ParamShape::ObjectType => "a known object type",
            ParamShape::Any => "any value",
        }
    }

    fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamShape::Any, _) => true,
            (ParamShape::Text, ParamValue::Text(_)) => true,
            (ParamShape::Number, ParamValue::Number(n)) => n.is_finite(),
            (ParamShape::Bool, ParamValue::Bool(_)) => true,
            (ParamShape::Vector, ParamValue::Vector(v)) => {
                v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
            }
            (ParamShape::Axis, ParamValue::Text(s)) => matches!(s.as_str(), "x" | "y" | "z"),
            (ParamShape::ZoomDirection, ParamValue::Text(s)) => matches!(s.as_str(), "in" | "out"),
            (ParamShape::ObjectType, ParamValue::Text(s)) => ObjectKind::from_name(s).is_some(),
            _ => false,
        }
    }
}

/// One accepted parameter of an action kind
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub shape: ParamShape,
    pub required: bool,
}

/// Closed parameter set of an action kind
#[derive(Debug, Clone, Copy)]
pub struct KindSchema {
    pub params: &'static [ParamSpec],
    pub target_required: bool,
}

/// Parameter bag keyed by parameter name
pub type Params = BTreeMap<String, ParamValue>;

/// One scene-mutation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "action")]
    pub kind: ActionKind,

    /// Object id, `"camera"` or `"scene"`
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub params: Params,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target: None,
            params: Params::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Check the action against its kind's closed parameter schema
    pub fn validate(&self) -> Result<(), ActionError> {
        let schema = self.kind.schema();

        if schema.target_required && self.target.as_deref().map_or(true, str::is_empty) {
            return Err(ActionError::MissingTarget(self.kind));
        }

        for (key, value) in &self.params {
            let spec = schema
                .params
                .iter()
                .find(|spec| spec.key == key)
                .ok_or_else(|| ActionError::UnknownParam {
                    kind: self.kind,
                    key: key.clone(),
                })?;

            if !spec.shape.accepts(value) {
                return Err(ActionError::InvalidParam {
                    kind: self.kind,
                    key: key.clone(),
                    expected: spec.shape.describe(),
                });
            }
        }

        if let Some(missing) = schema
            .params
            .iter()
            .find(|spec| spec.required && !self.params.contains_key(spec.key))
        {
            return Err(ActionError::MissingParam {
                kind: self.kind,
                key: missing.key,
            });
        }

        Ok(())
    }

    /// Short description used in summaries: `rotate_object on robot_arm_1`
    pub fn describe(&self) -> String {
        match &self.target {
            Some(target) if !target.is_empty() => format!("{} on {}", self.kind, target),
            _ => self.kind.to_string(),
        }
    }
}
