//! Rule-based prompt parsing
//!
//! Turns a natural-language prompt into scene actions by running a fixed,
//! ordered list of recognizers over the lowercased text. Recognizers are not
//! mutually exclusive: every one that fires contributes its actions, in
//! recognizer order. If none fires, a bare object mention is read as a
//! request to add that object.

mod recognizers;

use crate::action::Action;
use crate::context::SceneContext;
use crate::ids::IdAllocator;
use std::sync::Arc;
use tracing::debug;

/// Text and context a recognizer works on
pub(crate) struct Utterance<'a> {
    /// Trimmed, lowercased prompt
    pub text: &'a str,
    pub context: Option<&'a SceneContext>,
    pub ids: &'a IdAllocator,
}

type Recognizer = fn(&Utterance) -> Vec<Action>;

/// Recognizers in priority order
const RECOGNIZERS: &[(&str, Recognizer)] = &[
    ("add", recognizers::add),
    ("remove", recognizers::remove),
    ("rotate", recognizers::rotate),
    ("move", recognizers::translate),
    ("scale", recognizers::scale),
    ("color", recognizers::recolor),
    ("highlight", recognizers::highlight),
    ("camera", recognizers::camera),
    ("visibility", recognizers::visibility),
    ("reset", recognizers::reset),
    ("animate", recognizers::animate),
];

/// Rule-based prompt parser
pub struct PromptParser {
    ids: Arc<IdAllocator>,
}

impl Default for PromptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptParser {
    /// Create a parser with its own id allocator
    pub fn new() -> Self {
        Self::with_allocator(Arc::new(IdAllocator::new()))
    }

    /// Create a parser that shares an id allocator
    pub fn with_allocator(ids: Arc<IdAllocator>) -> Self {
        Self { ids }
    }

    /// Parse a prompt into actions; an empty result means "not understood"
    pub fn parse(&self, prompt: &str, context: Option<&SceneContext>) -> Vec<Action> {
        let text = prompt.trim().to_lowercase();
        let utterance = Utterance {
            text: &text,
            context,
            ids: &self.ids,
        };

        let mut actions = Vec::new();
        for (name, recognize) in RECOGNIZERS {
            let found = recognize(&utterance);
            if !found.is_empty() {
                debug!(recognizer = name, actions = found.len(), "Recognizer matched");
                actions.extend(found);
            }
        }

        if actions.is_empty() {
            actions = recognizers::infer_intent(&utterance);
            if !actions.is_empty() {
                debug!("Inferred add intent from object mention");
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, ParamValue, Vector3};
    use crate::context::SceneObject;

    fn scene() -> SceneContext {
        SceneContext::new(vec![
            SceneObject::new("conveyor_1", "conveyor")
                .with_name("Main Conveyor")
                .with_position(Vector3::new(0.0, 0.5, 0.0)),
            SceneObject::new("robot_arm_1", "robot_arm")
                .with_name("Robot Arm")
                .with_position(Vector3::new(-5.0, 0.0, 0.0)),
        ])
    }

    fn num(action: &Action, key: &str) -> f64 {
        action.param(key).and_then(ParamValue::as_f64).unwrap()
    }

    fn text<'a>(action: &'a Action, key: &str) -> &'a str {
        action.param(key).and_then(ParamValue::as_str).unwrap()
    }

    fn vector(action: &Action, key: &str) -> Vector3 {
        action.param(key).and_then(ParamValue::as_vector).unwrap()
    }

    fn flag(action: &Action, key: &str) -> bool {
        action.param(key).and_then(ParamValue::as_bool).unwrap()
    }

    #[test]
    fn test_add_robotic_arm() {
        let actions = PromptParser::new().parse("Add a robotic arm", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::AddObject);
        assert_eq!(text(&actions[0], "type"), "robot_arm");
        assert_eq!(text(&actions[0], "name"), "Robot Arm");
        assert_eq!(actions[0].target.as_deref(), Some("robot_arm_1"));
        assert_eq!(vector(&actions[0], "rotation"), Vector3::ZERO);
        assert_eq!(vector(&actions[0], "scale"), Vector3::ONE);
        assert_eq!(text(&actions[0], "color"), "#888888");
    }

    #[test]
    fn test_add_conveyor_belt() {
        let actions = PromptParser::new().parse("Create a conveyor belt", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(text(&actions[0], "type"), "conveyor");
    }

    #[test]
    fn test_add_with_color() {
        let actions = PromptParser::new().parse("Add a blue box", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(text(&actions[0], "color"), "#4444ff");
    }

    #[test]
    fn test_add_with_position() {
        let actions = PromptParser::new().parse("Add a box on the left", None);
        assert_eq!(actions.len(), 1);
        assert!(vector(&actions[0], "position").x < 0.0);
    }

    #[test]
    fn test_add_next_to_object() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Add a box next to the conveyor", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(vector(&actions[0], "position"), Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_add_skips_ids_in_context() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Add another conveyor", Some(&ctx));
        assert_eq!(actions[0].target.as_deref(), Some("conveyor_2"));
    }

    #[test]
    fn test_repeated_adds_get_distinct_ids() {
        let parser = PromptParser::new();
        let first = parser.parse("Add a box", None);
        let second = parser.parse("Add a box", None);
        assert_eq!(first[0].target.as_deref(), Some("box_1"));
        assert_eq!(second[0].target.as_deref(), Some("box_2"));
    }

    #[test]
    fn test_remove_object() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Delete the robot arm", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::RemoveObject);
        assert_eq!(actions[0].target.as_deref(), Some("robot_arm_1"));
        assert!(actions[0].params.is_empty());
    }

    #[test]
    fn test_remove_everything_resets_scene() {
        let actions = PromptParser::new().parse("Remove everything", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::ResetScene);
        assert_eq!(actions[0].target.as_deref(), Some("scene"));
        assert!(!flag(&actions[0], "keep_defaults"));
    }

    #[test]
    fn test_clear_scene_fires_remove_and_reset() {
        let actions = PromptParser::new().parse("Clear the scene", None);
        assert_eq!(actions.len(), 2);
        assert!(!flag(&actions[0], "keep_defaults"));
        assert!(flag(&actions[1], "keep_defaults"));
    }

    #[test]
    fn test_rotate_with_degrees() {
        let ctx = SceneContext::new(vec![SceneObject::new("robot_arm_1", "robot_arm")]);
        let actions = PromptParser::new().parse("Rotate the robot arm 45 degrees", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::RotateObject);
        assert_eq!(actions[0].target.as_deref(), Some("robot_arm_1"));
        assert_eq!(num(&actions[0], "degrees"), 45.0);
        assert_eq!(text(&actions[0], "axis"), "y");
    }

    #[test]
    fn test_rotate_defaults_and_axis() {
        let ctx = scene();
        let parser = PromptParser::new();

        let actions = parser.parse("Rotate the conveyor", Some(&ctx));
        assert_eq!(num(&actions[0], "degrees"), 30.0);

        let actions = parser.parse("Rotate the robot arm 90 degrees on x axis", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(text(&actions[0], "axis"), "x");
        assert_eq!(num(&actions[0], "degrees"), 90.0);
    }

    #[test]
    fn test_rotate_without_target_yields_nothing() {
        let actions = PromptParser::new().parse("Rotate it 45 degrees", None);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_move_absolute_when_position_found() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Move the conveyor left", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::MoveObject);
        assert!(flag(&actions[0], "absolute"));
        assert_eq!(vector(&actions[0], "position"), Vector3::new(-5.0, 0.0, 0.0));
        assert!(actions[0].param("delta").is_none());
    }

    #[test]
    fn test_move_delta() {
        // "robot arm" resolves the target but is not the raw type "robot_arm",
        // so no referent-relative position applies
        let ctx = SceneContext::new(vec![SceneObject::new("robot_arm_1", "robot_arm")]);
        let actions = PromptParser::new().parse("Move the robot arm up 4", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert!(!flag(&actions[0], "absolute"));
        assert_eq!(vector(&actions[0], "delta"), Vector3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_move_to_explicit_coordinates() {
        let ctx = SceneContext::new(vec![SceneObject::new("robot_arm_1", "robot_arm")]);
        let actions = PromptParser::new().parse("Move the robot arm to (1, 2.5, -3)", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].target.as_deref(), Some("robot_arm_1"));
        assert!(flag(&actions[0], "absolute"));
        assert_eq!(vector(&actions[0], "position"), Vector3::new(1.0, 2.5, -3.0));
        assert!(actions[0].param("delta").is_none());
    }

    #[test]
    fn test_remove_unknown_object_yields_nothing() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Delete the pallet", Some(&ctx));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_oversized_angle_falls_back_to_default() {
        let ctx = SceneContext::new(vec![SceneObject::new("robot_arm_1", "robot_arm")]);
        let prompt = format!("Rotate the robot arm {} degrees", "9".repeat(400));
        let actions = PromptParser::new().parse(&prompt, Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(num(&actions[0], "degrees"), 30.0);
        assert_eq!(actions[0].validate(), Ok(()));
    }

    #[test]
    fn test_scale() {
        let ctx = scene();
        let parser = PromptParser::new();

        let actions = parser.parse("Scale the conveyor to 1.5", Some(&ctx));
        assert_eq!(actions[0].kind, ActionKind::ScaleObject);
        assert_eq!(num(&actions[0], "factor"), 1.5);

        let actions = parser.parse("Grow the robot arm", Some(&ctx));
        assert!(num(&actions[0], "factor") > 1.0);

        let actions = parser.parse("Shrink the conveyor by 4", Some(&ctx));
        assert_eq!(num(&actions[0], "factor"), 0.25);

        let actions = parser.parse("Enlarge the conveyor 50 times", Some(&ctx));
        assert_eq!(num(&actions[0], "factor"), 1.5);

        let actions = parser.parse("Resize the conveyor to 20", Some(&ctx));
        assert_eq!(num(&actions[0], "factor"), 0.5);
    }

    #[test]
    fn test_set_color() {
        let ctx = scene();
        let parser = PromptParser::new();

        let actions = parser.parse("Paint the conveyor red", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::SetColor);
        assert_eq!(text(&actions[0], "color"), "#ff4444");

        let actions = parser.parse("Change the robot arm color to #00ff00", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(text(&actions[0], "color"), "#00ff00");
    }

    #[test]
    fn test_highlight_safety_zone() {
        let actions = PromptParser::new().parse("Highlight safety zone in red", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::AddSafetyZone);
        assert_eq!(actions[0].target.as_deref(), Some("safety_zone_1"));
        assert_eq!(text(&actions[0], "color"), "#ff4444");
        assert_eq!(vector(&actions[0], "size"), Vector3::new(5.0, 0.1, 5.0));
    }

    #[test]
    fn test_highlight_object() {
        let ctx = scene();
        let actions = PromptParser::new().parse("Highlight the conveyor", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::HighlightObject);
        assert_eq!(text(&actions[0], "color"), "#ffff00");
        assert_eq!(num(&actions[0], "duration"), 3000.0);
    }

    #[test]
    fn test_zoom() {
        let parser = PromptParser::new();

        let actions = parser.parse("Zoom in", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::CameraZoom);
        assert_eq!(actions[0].target.as_deref(), Some("camera"));
        assert_eq!(text(&actions[0], "direction"), "in");
        assert_eq!(num(&actions[0], "amount"), 0.5);

        let actions = parser.parse("Zoom out", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(text(&actions[0], "direction"), "out");
    }

    #[test]
    fn test_camera_preset() {
        let actions = PromptParser::new().parse("Zoom camera to inspection area", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::CameraFocus);
        assert_eq!(vector(&actions[0], "position"), Vector3::new(5.0, 5.0, 5.0));
        assert_eq!(vector(&actions[0], "target"), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_camera_frames_object() {
        let ctx = SceneContext::new(vec![SceneObject::new("box_1", "box")
            .with_name("Pallet")
            .with_position(Vector3::new(2.0, 0.0, -4.0))]);
        let actions = PromptParser::new().parse("Focus on the pallet", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(vector(&actions[0], "position"), Vector3::new(10.0, 6.0, 4.0));
        assert_eq!(vector(&actions[0], "target"), Vector3::new(2.0, 0.0, -4.0));
    }

    #[test]
    fn test_visibility() {
        let ctx = scene();
        let parser = PromptParser::new();

        let actions = parser.parse("Hide the robot arm", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::SetVisibility);
        assert!(!flag(&actions[0], "visible"));

        let actions = parser.parse("Show the conveyor", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert!(flag(&actions[0], "visible"));
    }

    #[test]
    fn test_reset_scene() {
        let actions = PromptParser::new().parse("Reset the scene", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::ResetScene);
        assert!(flag(&actions[0], "keep_defaults"));
    }

    #[test]
    fn test_animation() {
        let ctx = scene();
        let parser = PromptParser::new();

        let actions = parser.parse("Start animating the robot arm", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::AnimateObject);
        assert!(flag(&actions[0], "animate"));

        let actions = parser.parse("Stop the conveyor", Some(&ctx));
        assert_eq!(actions.len(), 1);
        assert!(!flag(&actions[0], "animate"));
    }

    #[test]
    fn test_infer_intent_from_bare_mention() {
        let actions = PromptParser::new().parse("A green sphere", None);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::AddObject);
        assert_eq!(text(&actions[0], "type"), "sphere");
        assert_eq!(text(&actions[0], "color"), "#44ff44");
    }

    #[test]
    fn test_unrecognized_prompts() {
        let parser = PromptParser::new();
        assert!(parser.parse("", None).is_empty());
        assert!(parser.parse("   ", None).is_empty());
        assert!(parser.parse("Do something completely random xyz", None).is_empty());
    }

    #[test]
    fn test_shared_allocator() {
        let ids = Arc::new(IdAllocator::new());
        let a = PromptParser::with_allocator(Arc::clone(&ids));
        let b = PromptParser::with_allocator(Arc::clone(&ids));
        a.parse("Add a box", None);
        let actions = b.parse("Add a box", None);
        assert_eq!(actions[0].target.as_deref(), Some("box_2"));
    }

    #[test]
    fn test_rule_output_satisfies_schema() {
        let ctx = scene();
        let parser = PromptParser::new();
        let prompts = [
            "Add a robotic arm next to the conveyor",
            "Remove the conveyor",
            "Remove everything",
            "Rotate the robot arm 45 degrees",
            "Move the robot arm up",
            "Move the conveyor to (1, 2, 3)",
            "Shrink the conveyor",
            "Paint the conveyor gold",
            "Highlight the conveyor",
            "Highlight the hazard area",
            "Zoom in",
            "Look at the overview",
            "Focus on the main conveyor",
            "Hide the robot arm",
            "Reset everything",
            "Pause the conveyor",
            "A pipe",
        ];
        for prompt in prompts {
            let actions = parser.parse(prompt, Some(&ctx));
            assert!(!actions.is_empty(), "no action for {prompt:?}");
            for action in actions {
                assert_eq!(action.validate(), Ok(()), "{prompt:?} -> {action:?}");
            }
        }
    }
}
