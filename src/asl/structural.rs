use serde_json::{Map, Value};

use super::{AslDiagnostic, AslSchemaValidator};

const STATE_TYPES: &[&str] = &[
    "Task", "Pass", "Choice", "Wait", "Succeed", "Fail", "Parallel", "Map",
];

const WAIT_FIELDS: &[&str] = &["Seconds", "Timestamp", "SecondsPath", "TimestampPath"];

/// Structural ASL rules: start state, transitions, per-type required
/// fields, and nested machines in `Parallel` and `Map`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl AslSchemaValidator for StructuralValidator {
    fn validate(&self, definition: &Value) -> Vec<AslDiagnostic> {
        let mut diagnostics = Vec::new();
        validate_machine(definition, "", &mut diagnostics);
        diagnostics
    }
}

fn pointer(parent: &str, token: &str) -> String {
    format!("{parent}/{}", token.replace('~', "~0").replace('/', "~1"))
}

fn validate_machine(value: &Value, path: &str, out: &mut Vec<AslDiagnostic>) {
    let Some(machine) = value.as_object() else {
        out.push(AslDiagnostic::new(path, "state machine must be an object"));
        return;
    };

    let start_at = match machine.get("StartAt") {
        Some(Value::String(name)) => Some(name.as_str()),
        Some(_) => {
            out.push(AslDiagnostic::new(pointer(path, "StartAt"), "StartAt must be a string"));
            None
        }
        None => {
            out.push(AslDiagnostic::new(path, "missing required property StartAt"));
            None
        }
    };

    let states_path = pointer(path, "States");
    let states = match machine.get("States") {
        Some(Value::Object(states)) if states.is_empty() => {
            out.push(AslDiagnostic::new(&states_path, "States must contain at least one state"));
            return;
        }
        Some(Value::Object(states)) => states,
        Some(_) => {
            out.push(AslDiagnostic::new(&states_path, "States must be an object"));
            return;
        }
        None => {
            out.push(AslDiagnostic::new(path, "missing required property States"));
            return;
        }
    };

    if let Some(name) = start_at {
        if !states.contains_key(name) {
            out.push(AslDiagnostic::new(
                pointer(path, "StartAt"),
                format!("StartAt \"{name}\" does not name a state"),
            ));
        }
    }

    for (name, state) in states {
        validate_state(state, states, &pointer(&states_path, name), out);
    }
}

fn validate_state(
    value: &Value,
    states: &Map<String, Value>,
    path: &str,
    out: &mut Vec<AslDiagnostic>,
) {
    let Some(state) = value.as_object() else {
        out.push(AslDiagnostic::new(path, "state must be an object"));
        return;
    };

    let state_type = match state.get("Type") {
        Some(Value::String(t)) if STATE_TYPES.contains(&t.as_str()) => t.as_str(),
        Some(Value::String(t)) => {
            out.push(AslDiagnostic::new(
                pointer(path, "Type"),
                format!("unknown state type \"{t}\""),
            ));
            return;
        }
        Some(_) => {
            out.push(AslDiagnostic::new(pointer(path, "Type"), "Type must be a string"));
            return;
        }
        None => {
            out.push(AslDiagnostic::new(path, "missing required property Type"));
            return;
        }
    };

    check_target(state.get("Next"), states, &pointer(path, "Next"), out);

    match state_type {
        "Choice" => {
            validate_choice(state, states, path, out);
            return;
        }
        "Succeed" | "Fail" => {
            for field in ["Next", "End"] {
                if state.contains_key(field) {
                    out.push(AslDiagnostic::new(
                        pointer(path, field),
                        format!("{state_type} state cannot have {field}"),
                    ));
                }
            }
            return;
        }
        _ => {}
    }

    check_transition(state, path, out);

    match state_type {
        "Task" => {
            if !matches!(state.get("Resource"), Some(Value::String(_))) {
                out.push(AslDiagnostic::new(path, "Task state requires a string Resource"));
            }
        }
        "Wait" => {
            let count = WAIT_FIELDS.iter().filter(|f| state.contains_key(**f)).count();
            if count != 1 {
                out.push(AslDiagnostic::new(
                    path,
                    "Wait state requires exactly one of Seconds, Timestamp, SecondsPath, TimestampPath",
                ));
            }
        }
        "Parallel" => match state.get("Branches") {
            Some(Value::Array(branches)) if !branches.is_empty() => {
                let branches_path = pointer(path, "Branches");
                for (i, branch) in branches.iter().enumerate() {
                    validate_machine(branch, &pointer(&branches_path, &i.to_string()), out);
                }
            }
            _ => out.push(AslDiagnostic::new(
                path,
                "Parallel state requires a non-empty Branches array",
            )),
        },
        "Map" => {
            let processor = ["ItemProcessor", "Iterator"]
                .into_iter()
                .find_map(|field| state.get(field).map(|v| (field, v)));
            match processor {
                Some((field, machine)) => validate_machine(machine, &pointer(path, field), out),
                None => out.push(AslDiagnostic::new(
                    path,
                    "Map state requires an ItemProcessor or Iterator",
                )),
            }
        }
        _ => {}
    }
}

fn check_target(
    target: Option<&Value>,
    states: &Map<String, Value>,
    path: &str,
    out: &mut Vec<AslDiagnostic>,
) {
    match target {
        None => {}
        Some(Value::String(name)) if states.contains_key(name) => {}
        Some(Value::String(name)) => out.push(AslDiagnostic::new(
            path,
            format!("\"{name}\" does not name a state"),
        )),
        Some(_) => out.push(AslDiagnostic::new(path, "transition target must be a string")),
    }
}

fn check_transition(state: &Map<String, Value>, path: &str, out: &mut Vec<AslDiagnostic>) {
    let has_next = state.contains_key("Next");
    let is_end = matches!(state.get("End"), Some(Value::Bool(true)));

    match (has_next, is_end) {
        (true, true) => out.push(AslDiagnostic::new(path, "state cannot have both Next and End")),
        (false, false) => out.push(AslDiagnostic::new(path, "state requires Next or \"End\": true")),
        _ => {}
    }
}

fn validate_choice(
    state: &Map<String, Value>,
    states: &Map<String, Value>,
    path: &str,
    out: &mut Vec<AslDiagnostic>,
) {
    if state.contains_key("End") {
        out.push(AslDiagnostic::new(pointer(path, "End"), "Choice state cannot have End"));
    }

    check_target(state.get("Default"), states, &pointer(path, "Default"), out);

    let choices_path = pointer(path, "Choices");
    let choices = match state.get("Choices") {
        Some(Value::Array(choices)) if !choices.is_empty() => choices,
        _ => {
            out.push(AslDiagnostic::new(
                path,
                "Choice state requires a non-empty Choices array",
            ));
            return;
        }
    };

    for (i, rule) in choices.iter().enumerate() {
        let rule_path = pointer(&choices_path, &i.to_string());
        match rule.get("Next") {
            Some(next) => check_target(Some(next), states, &pointer(&rule_path, "Next"), out),
            None => out.push(AslDiagnostic::new(rule_path, "choice rule requires Next")),
        }
    }
}
