//! Host capabilities: `context`, `roverApi`, `memory`, `rover`, `json` and
//! `lib` as seen from a running program.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::library;
use crate::value::{Capability, Value};
use rover_types::world::{Action, Direction, SensorDirection};

const ACTION_METHODS: &[&str] = &["Move", "Turn", "Collect", "Scan", "Write", "Set", "Get", "Kill"];
const MEMORY_METHODS: &[&str] = &["Set", "Get", "Kill"];
const JSON_METHODS: &[&str] = &["Stringify", "Parse"];

fn method(owner: Capability, name: &str, known: &[&str]) -> Option<Value> {
    known.contains(&name).then(|| Value::Function {
        owner,
        name: name.to_string(),
    })
}

impl Evaluator<'_> {
    /// `cap.name`. Private (`%name`) and plain reads are the same here.
    pub(crate) fn read_capability(&mut self, cap: Capability, name: &str) -> EvalResult<Value> {
        Ok(match cap {
            Capability::Context => match name {
                "rover" => Value::Capability(Capability::Rover),
                "memory" => Value::Capability(Capability::Memory),
                "output" => Value::Capability(Capability::Output),
                _ => method(cap, name, ACTION_METHODS).unwrap_or(Value::Nil),
            },
            Capability::RoverApi => method(cap, name, ACTION_METHODS).unwrap_or(Value::Nil),
            Capability::Lib => Value::Function {
                owner: cap,
                name: name.to_string(),
            },
            Capability::Json => method(cap, name, JSON_METHODS).unwrap_or(Value::Nil),
            Capability::Memory => match method(cap, name, MEMORY_METHODS) {
                Some(function) => function,
                None => self.memory.get_or_empty(name),
            },
            Capability::Rover => self.read_rover(name),
            Capability::Output => match name {
                "action" => self.action_value(),
                _ => Value::Nil,
            },
        })
    }

    fn read_rover(&mut self, name: &str) -> Value {
        let rover = self.rover;
        match name {
            "x" => Value::Number(f64::from(rover.x)),
            "z" => Value::Number(f64::from(rover.z)),
            "direction" => Value::str(rover.direction.as_str()),
            "fuel" => Value::Number(rover.fuel as f64),
            "health" => Value::Number(rover.health as f64),
            "score" => Value::Number(rover.score as f64),
            "steps" => Value::Number(rover.steps as f64),
            "sensors" => Value::str(self.host.scan(SensorDirection::Front).as_str()),
            _ => Value::Nil,
        }
    }

    fn action_value(&self) -> Value {
        self.action
            .and_then(|action| serde_json::to_value(action).ok())
            .map_or(Value::Nil, |json| Value::from_json(&json))
    }

    /// Call a capability method with evaluated arguments.
    pub(crate) fn call_capability(
        &mut self,
        owner: Capability,
        name: &str,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        match owner {
            Capability::Lib => library::call_lib(name, &args, self.rng),
            Capability::Json => library::call_json(name, &args),
            Capability::Memory => self.call_memory(name, &args),
            Capability::Context | Capability::RoverApi => match name {
                "Move" => {
                    self.set_action(Some(Action::Move));
                    Ok(Value::Nil)
                }
                "Collect" => {
                    self.set_action(Some(Action::Collect));
                    Ok(Value::Nil)
                }
                "Turn" => {
                    let target = args.first().map(Value::to_string).unwrap_or_default();
                    let direction = self.resolve_turn(&target)?;
                    self.set_action(Some(Action::Turn(direction)));
                    Ok(Value::Nil)
                }
                "Scan" => {
                    let target = args.first().map_or_else(|| "front".to_string(), Value::to_string);
                    let direction = SensorDirection::parse(&target).ok_or_else(|| {
                        EvalError::invalid(
                            "Scan",
                            format!("expected front, far, left, right or back, got '{target}'"),
                        )
                    })?;
                    Ok(Value::str(self.host.scan(direction).as_str()))
                }
                "Write" => {
                    let line = args
                        .iter()
                        .map(Value::to_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    self.write_line(line);
                    Ok(Value::Nil)
                }
                _ => self.call_memory(name, &args),
            },
            Capability::Rover | Capability::Output => {
                Err(EvalError::NotCallable(format!("{}.{name}", owner.name())))
            }
        }
    }

    fn call_memory(&mut self, name: &str, args: &[Value]) -> EvalResult<Value> {
        let path = args.first().map(Value::to_string).unwrap_or_default();
        match name {
            "Set" => {
                let value = args.get(1).cloned().unwrap_or(Value::Nil);
                self.memory.set(&path, value);
                Ok(Value::Nil)
            }
            "Get" => Ok(match (self.memory.get(&path), args.get(1)) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => Value::str(""),
            }),
            "Kill" => Ok(Value::Bool(self.memory.kill(&path))),
            _ => Err(EvalError::NotCallable(format!("memory.{name}"))),
        }
    }

    /// Compass names turn to that heading; `left` and `right` are relative
    /// to the rover's current facing.
    fn resolve_turn(&self, target: &str) -> EvalResult<Direction> {
        match target.to_ascii_lowercase().as_str() {
            "left" => Ok(self.rover.direction.turn_left()),
            "right" => Ok(self.rover.direction.turn_right()),
            other => Direction::parse(other).ok_or_else(|| {
                EvalError::invalid(
                    "Turn",
                    format!("expected north, east, south, west, left or right, got '{target}'"),
                )
            }),
        }
    }

    /// Interpret a value written to `context.output.action`.
    ///
    /// Accepts `"move"`, `"collect"`, a direction name (a turn), a
    /// `{type, direction}` record, or undefined to clear the slot.
    pub(crate) fn action_from_value(&self, value: &Value) -> EvalResult<Option<Action>> {
        match value {
            Value::Nil => Ok(None),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "move" => Ok(Some(Action::Move)),
                "collect" => Ok(Some(Action::Collect)),
                _ => self.resolve_turn(s).map(|d| Some(Action::Turn(d))).map_err(|_| {
                    EvalError::invalid("output.action", format!("unknown action '{s}'"))
                }),
            },
            Value::Record(_) => serde_json::from_value::<Action>(value.to_json())
                .map(Some)
                .map_err(|e| EvalError::invalid("output.action", e.to_string())),
            other => Err(EvalError::invalid(
                "output.action",
                format!("expected an action, got {}", other.type_name()),
            )),
        }
    }
}
