//! The `lib` and `json` namespaces.
//!
//! Library functions are pure apart from `Random`, which draws from the
//! program's seeded generator so runs replay identically.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use rand::Rng;
use rand_pcg::Pcg32;

/// Call `lib.<name>`. Names match case-insensitively and accept the
/// one-letter abbreviations `P`, `L`, `G` and `R`.
pub(crate) fn call_lib(name: &str, args: &[Value], rng: &mut Pcg32) -> EvalResult<Value> {
    match name.to_ascii_lowercase().as_str() {
        "piece" | "p" => Ok(piece(args)),
        "length" | "l" => Ok(length(args)),
        "get" | "g" => Ok(get(args)),
        "random" | "r" => random(args, rng),
        _ => Err(EvalError::NotCallable(format!("lib.{name}"))),
    }
}

pub(crate) fn call_json(name: &str, args: &[Value]) -> EvalResult<Value> {
    let arg = args.first().cloned().unwrap_or(Value::Nil);
    match name {
        "Stringify" | "stringify" => Ok(match arg {
            Value::Nil => Value::Nil,
            other => Value::String(other.to_json().to_string()),
        }),
        "Parse" | "parse" => {
            let text = arg.to_string();
            serde_json::from_str::<serde_json::Value>(&text)
                .map(|json| Value::from_json(&json))
                .map_err(|e| EvalError::Json(e.to_string()))
        }
        _ => Err(EvalError::NotCallable(format!("json.{name}"))),
    }
}

fn arg_string(args: &[Value], index: usize) -> String {
    args.get(index).map(Value::to_string).unwrap_or_default()
}

/// `Piece(str, delim, index)`: the 1-based `index`th field of `str`.
fn piece(args: &[Value]) -> Value {
    let text = arg_string(args, 0);
    let delim = arg_string(args, 1);
    let index = args.get(2).map_or(1.0, Value::to_number).floor();
    if !(index >= 1.0) {
        return Value::str("");
    }
    let index = index as usize - 1;
    let field = if delim.is_empty() {
        text.chars().nth(index).map(String::from)
    } else {
        text.split(delim.as_str()).nth(index).map(str::to_string)
    };
    Value::String(field.unwrap_or_default())
}

/// `Length(str)` counts characters; `Length(str, delim)` counts fields.
fn length(args: &[Value]) -> Value {
    let text = arg_string(args, 0);
    let count = match args.get(1) {
        None => text.chars().count(),
        Some(delim) => {
            let delim = delim.to_string();
            if delim.is_empty() {
                0
            } else {
                text.split(delim.as_str()).count()
            }
        }
    };
    Value::Number(count as f64)
}

/// `Get(value, fallback)`: `value` unless it is undefined or empty.
fn get(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Nil) | None => args.get(1).cloned().unwrap_or_else(|| Value::str("")),
        Some(Value::String(s)) if s.is_empty() => {
            args.get(1).cloned().unwrap_or_else(|| Value::str(""))
        }
        Some(value) => value.clone(),
    }
}

/// `Random(max)`: an integer in `[0, max)`.
fn random(args: &[Value], rng: &mut Pcg32) -> EvalResult<Value> {
    let max = args.first().map_or(f64::NAN, Value::to_number).floor();
    if !(max >= 1.0) {
        return Err(EvalError::invalid(
            "lib.Random",
            format!("max must be a positive number, got {}", crate::value::format_number(max)),
        ));
    }
    Ok(Value::Number(rng.random_range(0..max as u64) as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn s(text: &str) -> Value {
        Value::str(text)
    }

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn piece_is_one_based() {
        let mut r = rng();
        let args = [s("a.b.c"), s("."), n(2.0)];
        assert_eq!(call_lib("Piece", &args, &mut r).unwrap(), s("b"));
        let args = [s("a.b.c"), s("."), n(9.0)];
        assert_eq!(call_lib("Piece", &args, &mut r).unwrap(), s(""));
        let args = [s("a.b.c"), s("."), n(0.0)];
        assert_eq!(call_lib("Piece", &args, &mut r).unwrap(), s(""));
    }

    #[test]
    fn piece_defaults_to_first_field() {
        let mut r = rng();
        assert_eq!(call_lib("P", &[s("x,y"), s(",")], &mut r).unwrap(), s("x"));
    }

    #[test]
    fn length_counts_chars_or_fields() {
        let mut r = rng();
        assert_eq!(call_lib("Length", &[s("rover")], &mut r).unwrap(), n(5.0));
        assert_eq!(call_lib("length", &[s("a,b,c"), s(",")], &mut r).unwrap(), n(3.0));
        assert_eq!(call_lib("L", &[s(""), s(",")], &mut r).unwrap(), n(1.0));
    }

    #[test]
    fn get_falls_back_on_empty() {
        let mut r = rng();
        assert_eq!(call_lib("Get", &[s(""), n(3.0)], &mut r).unwrap(), n(3.0));
        assert_eq!(call_lib("Get", &[Value::Nil, n(3.0)], &mut r).unwrap(), n(3.0));
        assert_eq!(call_lib("Get", &[n(0.0), n(3.0)], &mut r).unwrap(), n(0.0));
    }

    #[test]
    fn random_is_seeded_and_in_range() {
        let draws = |seed| {
            let mut r = Pcg32::seed_from_u64(seed);
            (0..20)
                .map(|_| call_lib("Random", &[n(10.0)], &mut r).unwrap())
                .collect::<Vec<_>>()
        };
        let first = draws(42);
        assert_eq!(first, draws(42));
        for v in &first {
            let x = v.to_number();
            assert!((0.0..10.0).contains(&x) && x.fract() == 0.0);
        }
    }

    #[test]
    fn random_rejects_non_positive_max() {
        let mut r = rng();
        assert!(matches!(
            call_lib("Random", &[n(0.0)], &mut r),
            Err(EvalError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn unknown_lib_function() {
        let mut r = rng();
        assert_eq!(
            call_lib("Order", &[], &mut r),
            Err(EvalError::NotCallable("lib.Order".into()))
        );
    }

    #[test]
    fn json_round_trip() {
        let text = call_json("Stringify", &[n(1.0)]).unwrap();
        assert_eq!(text, s("1"));
        let parsed = call_json("Parse", &[s(r#"{"a":[1,"x"]}"#)]).unwrap();
        assert_eq!(parsed.to_string(), r#"{"a":[1,"x"]}"#);
        assert!(matches!(call_json("Parse", &[s("{")]), Err(EvalError::Json(_))));
    }
}
