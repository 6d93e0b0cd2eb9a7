//! Scene context snapshot supplied by the editor

use crate::action::Vector3;
use serde::{Deserialize, Serialize};

/// An object currently present in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,

    /// Object type wire name, e.g. `"robot_arm"`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub position: Vector3,

    #[serde(default)]
    pub color: Option<String>,
}

impl SceneObject {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: None,
            position: Vector3::ZERO,
            color: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// Lowercased name, or `None` when unnamed or blank
    pub fn name_lower(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::to_lowercase)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Read-only snapshot of the scene, in the editor's object order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContext {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl SceneContext {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    pub fn find(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// One line per object, as handed to the language model
    pub fn describe(&self) -> String {
        let mut description = String::from("Current Scene Objects:\n");
        if self.objects.is_empty() {
            description.push_str("No objects in scene.\n");
            return description;
        }

        for obj in &self.objects {
            description.push_str(&format!(
                "- ID: {}, Type: {}, Name: {}, Position: {}, Color: {}\n",
                obj.id,
                obj.kind,
                obj.name.as_deref().unwrap_or("none"),
                obj.position,
                obj.color.as_deref().unwrap_or("none"),
            ));
        }
        description
    }
}
