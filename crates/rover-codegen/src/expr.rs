//! Expression emission.
//!
//! Operator precedence in RoverScript matches JavaScript, so binary trees
//! are written back in source order without added parentheses.

use rover_types::ast::*;

pub(crate) fn emit_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

/// One `Write` argument. With several arguments, a loose binary expression
/// is parenthesised so the `+ " " +` joins cannot re-associate it.
pub(crate) fn emit_write_arg(expr: &Expr, arg_count: usize) -> String {
    match &expr.kind {
        ExprKind::Binary { op, .. } if arg_count > 1 && op.precedence() <= BinOp::Add.precedence() => {
            format!("({})", emit_expr(expr))
        }
        _ => emit_expr(expr),
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Number(text) => out.push_str(text),
        ExprKind::Str(value) => write_string(out, value),
        ExprKind::Identifier(name) => out.push_str(name),
        ExprKind::Member {
            object,
            name,
            private,
        } => {
            write_expr(out, object);
            out.push('.');
            if *private {
                out.push('_');
            }
            out.push_str(name);
        }
        ExprKind::Call { callee, args } => {
            write_expr(out, callee);
            write_args(out, args);
        }
        ExprKind::LibCall { name, args } => {
            out.push_str("lib.");
            out.push_str(name);
            write_args(out, args);
        }
        ExprKind::Object(entries) => {
            out.push('{');
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if entry.quoted {
                    write_string(out, &entry.key);
                } else {
                    out.push_str(&entry.key);
                }
                out.push_str(": ");
                write_expr(out, &entry.value);
            }
            out.push('}');
        }
        ExprKind::Binary { left, op, right } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_expr(out, right);
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(op.as_str());
            write_expr(out, operand);
        }
        ExprKind::Paren(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }
        ExprKind::Malformed(text) => out.push_str(text),
    }
}

fn write_args(out: &mut String, args: &[Expr]) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_expr(out, arg);
    }
    out.push(')');
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_types::Span;

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::point(1, 1))
    }

    fn num(n: &str) -> Expr {
        e(ExprKind::Number(n.into()))
    }

    #[test]
    fn strings_are_reescaped() {
        let expr = e(ExprKind::Str("say \"hi\"\\".into()));
        assert_eq!(emit_expr(&expr), r#""say \"hi\"\\""#);
    }

    #[test]
    fn empty_object() {
        assert_eq!(emit_expr(&e(ExprKind::Object(vec![]))), "{}");
    }

    #[test]
    fn write_arg_parenthesised_only_with_several_args() {
        let sum = e(ExprKind::Binary {
            left: Box::new(num("1")),
            op: BinOp::Add,
            right: Box::new(num("2")),
        });
        assert_eq!(emit_write_arg(&sum, 1), "1 + 2");
        assert_eq!(emit_write_arg(&sum, 2), "(1 + 2)");

        let product = e(ExprKind::Binary {
            left: Box::new(num("3")),
            op: BinOp::Mul,
            right: Box::new(num("4")),
        });
        assert_eq!(emit_write_arg(&product, 2), "3 * 4");
    }
}
