//! Statement emission.

use rover_types::ast::*;

use crate::emitter::Emitter;
use crate::expr::{emit_expr, emit_write_arg};

impl Emitter {
    pub(crate) fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Set(set) => {
                let text = set
                    .assignments
                    .iter()
                    .map(|a| format!("{} = {};", emit_expr(&a.target), emit_expr(&a.value)))
                    .collect::<Vec<_>>()
                    .join(" ");
                self.item(set.span, &text);
            }
            Stmt::Do(d) => {
                let expr = emit_expr(&d.expr);
                let text = if d.awaited {
                    format!("await {expr};")
                } else {
                    format!("{expr};")
                };
                self.item(d.span, &text);
            }
            Stmt::Write(w) => {
                let text = if w.args.is_empty() {
                    "roverApi.Write(\"\");".to_string()
                } else {
                    let joined = w
                        .args
                        .iter()
                        .map(|arg| emit_write_arg(arg, w.args.len()))
                        .collect::<Vec<_>>()
                        .join(" + \" \" + ");
                    format!("roverApi.Write({joined});")
                };
                self.item(w.span, &text);
            }
            Stmt::If(stmt) => self.emit_if(stmt),
            Stmt::While(w) => {
                let header = format!("while ({}) {{", emit_expr(&w.condition));
                self.item(head(w.span), &header);
                self.emit_block(&w.body);
            }
            Stmt::For(f) => {
                let var = &f.var.name;
                let step = f.step.as_ref().map_or_else(|| "1".to_string(), emit_expr);
                let header = format!(
                    "for (let {var} = {}; {var} <= {}; {var} += {step}) {{",
                    emit_expr(&f.start),
                    emit_expr(&f.end),
                );
                self.item(head(f.span), &header);
                self.emit_block(&f.body);
            }
            Stmt::Quit(span) => self.item(*span, "return;"),
            Stmt::Malformed(m) => self.item(m.span, &m.text),
        }
    }

    fn emit_if(&mut self, stmt: &IfStmt) {
        for (i, branch) in stmt.branches.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "else if" };
            let header = format!("{keyword} ({}) {{", emit_expr(&branch.condition));
            self.item(branch.keyword, &header);
            self.emit_block(&branch.body);
        }
        if let Some(else_branch) = &stmt.else_branch {
            self.item(else_branch.keyword, "else {");
            self.emit_block(&else_branch.body);
        }
    }

    /// Body statements then the closing brace at its own source position.
    fn emit_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.emit_stmt(stmt);
        }
        self.item(block.close, "}");
    }
}

/// Position of a loop's command word; the header item ends on that line.
fn head(span: rover_types::Span) -> rover_types::Span {
    rover_types::Span::point(span.start_line, span.start_col)
}
